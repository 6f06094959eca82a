//! Synchronization request and report types

use super::editor_types::EditorId;
use serde::{Deserialize, Serialize};

/// One sync execution: copy `extension_ids` from `source_editor` to every target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub source_editor: EditorId,
    pub target_editors: Vec<EditorId>,
    pub extension_ids: Vec<String>,
    pub overwrite_conflicts: bool,
}

/// Outcome of syncing to a single target editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub target_editor: EditorId,
    pub success: bool,
    #[serde(default)]
    pub copied_count: usize,
    #[serde(default)]
    pub skipped_count: usize,
    #[serde(default)]
    pub overwritten_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl SyncResult {
    pub fn new(target_editor: EditorId) -> Self {
        Self {
            target_editor,
            success: false,
            copied_count: 0,
            skipped_count: 0,
            overwritten_count: 0,
            conflicts: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Totals across all targets of one sync execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub source_editor: EditorId,
    pub results: Vec<SyncResult>,
    pub total_copied: usize,
    pub total_skipped: usize,
    pub total_errors: usize,
}

impl SyncReport {
    /// Aggregate per-target results into a report
    pub fn from_results(source_editor: EditorId, results: Vec<SyncResult>) -> Self {
        Self {
            source_editor,
            total_copied: results.iter().map(|r| r.copied_count).sum(),
            total_skipped: results.iter().map(|r| r.skipped_count).sum(),
            total_errors: results.iter().map(|r| r.errors.len()).sum(),
            results,
        }
    }

    /// Per-item failures make this a partial success, not a failed call
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn result_for(&self, target: &EditorId) -> Option<&SyncResult> {
        self.results.iter().find(|r| &r.target_editor == target)
    }
}
