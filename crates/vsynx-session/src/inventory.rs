//! Lazily-populated membership index of target editors
//!
//! Each editor entry is either not loaded or a fully-populated set of
//! lower-cased extension ids. A loaded-and-empty entry is distinct from an
//! unloaded one.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use vsynx_core::types::{EditorId, ExtensionId};
use vsynx_core::{ExtensionBackend, Result};

/// Observable state of one editor's inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryState {
    NotLoaded,
    Loaded(BTreeSet<String>),
}

impl InventoryState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, InventoryState::Loaded(_))
    }
}

#[derive(Debug)]
enum Slot {
    /// A fetch is in flight; the ticket identifies it
    Loading(u64),
    Loaded { ids: BTreeSet<String>, stale: bool },
}

#[derive(Debug, Default)]
struct CacheState {
    slots: HashMap<EditorId, Slot>,
    next_ticket: u64,
}

/// Cloneable handle to the inventory index
#[derive(Clone)]
pub struct InventoryCache {
    backend: Arc<dyn ExtensionBackend>,
    state: Arc<RwLock<CacheState>>,
}

impl InventoryCache {
    pub fn new(backend: Arc<dyn ExtensionBackend>) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(CacheState::default())),
        }
    }

    /// Load an editor's inventory unless a fresh entry exists or a load is running
    ///
    /// A stale entry is evicted and fetched again. A failed fetch leaves the
    /// editor unloaded.
    pub async fn ensure_loaded(&self, editor: &EditorId) -> Result<()> {
        let ticket = {
            let mut state = self.state.write().await;
            match state.slots.get(editor) {
                Some(Slot::Loaded { stale: false, .. }) | Some(Slot::Loading(_)) => return Ok(()),
                _ => {}
            }
            state.next_ticket += 1;
            let ticket = state.next_ticket;
            state.slots.insert(editor.clone(), Slot::Loading(ticket));
            ticket
        };

        debug!("Loading inventory for {}", editor);
        let fetched = self.backend.list_extensions(editor).await;

        let mut state = self.state.write().await;
        if !matches!(state.slots.get(editor), Some(Slot::Loading(t)) if *t == ticket) {
            debug!("Inventory for {} was cleared while loading", editor);
            return Ok(());
        }
        match fetched {
            Ok(records) => {
                let ids: BTreeSet<String> = records.iter().map(|r| r.id.normalized()).collect();
                debug!("Inventory for {} holds {} extensions", editor, ids.len());
                state
                    .slots
                    .insert(editor.clone(), Slot::Loaded { ids, stale: false });
                Ok(())
            }
            Err(e) => {
                state.slots.remove(editor);
                Err(e)
            }
        }
    }

    pub async fn state(&self, editor: &EditorId) -> InventoryState {
        match self.state.read().await.slots.get(editor) {
            Some(Slot::Loaded { ids, .. }) => InventoryState::Loaded(ids.clone()),
            _ => InventoryState::NotLoaded,
        }
    }

    pub async fn is_loaded(&self, editor: &EditorId) -> bool {
        matches!(
            self.state.read().await.slots.get(editor),
            Some(Slot::Loaded { .. })
        )
    }

    /// Membership lookup; false for an unloaded editor
    pub async fn has(&self, editor: &EditorId, extension: &ExtensionId) -> bool {
        match self.state.read().await.slots.get(editor) {
            Some(Slot::Loaded { ids, .. }) => ids.contains(&extension.normalized()),
            _ => false,
        }
    }

    /// Keep the entry readable but refetch it on the next `ensure_loaded`
    pub async fn mark_stale(&self, editor: &EditorId) {
        if let Some(Slot::Loaded { stale, .. }) = self.state.write().await.slots.get_mut(editor) {
            *stale = true;
        }
    }

    /// Drop every entry, including loads in flight
    pub async fn clear(&self) {
        self.state.write().await.slots.clear();
    }

    /// Number of loaded entries
    pub async fn loaded_count(&self) -> usize {
        self.state
            .read()
            .await
            .slots
            .values()
            .filter(|slot| matches!(slot, Slot::Loaded { .. }))
            .count()
    }
}
