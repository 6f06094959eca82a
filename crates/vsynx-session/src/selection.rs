//! Extension selection set and candidate view filter

use std::collections::BTreeSet;
use vsynx_core::types::{ExtensionId, ExtensionRecord};

/// Extensions chosen for synchronization
///
/// Ids compare without regard to case, so an id is a member at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<ExtensionId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the id if absent, remove it if present; returns true when now selected
    pub fn toggle(&mut self, id: ExtensionId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Union with `ids`; returns how many were newly added
    pub fn union<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = ExtensionId>,
    {
        let before = self.ids.len();
        self.ids.extend(ids);
        self.ids.len() - before
    }

    pub fn contains(&self, id: &ExtensionId) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtensionId> {
        self.ids.iter()
    }

    /// Ids as sent to the backend
    pub fn to_ids(&self) -> Vec<String> {
        self.ids.iter().map(|id| id.as_str().to_string()).collect()
    }
}

/// Which candidates the view shows relative to the target inventories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    All,
    Missing,
    Present,
}

/// Projection over the candidate list; never touches the selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    pub text: String,
    pub mode: ViewMode,
}

impl CandidateFilter {
    /// Case-insensitive substring match on the id and name
    pub fn matches_text(&self, record: &ExtensionRecord) -> bool {
        let needle = self.text.trim().to_lowercase();
        needle.is_empty()
            || record.id.normalized().contains(&needle)
            || record.name.to_lowercase().contains(&needle)
    }
}
