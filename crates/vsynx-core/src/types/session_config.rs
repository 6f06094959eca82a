//! Session configuration types for orchestration timing and limits
//!
//! These values are the tunables of the search, sync and editor controllers.
//! Defaults match the behaviour users expect from the desktop client.

use super::editor_types::{editor_ids, EditorId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SessionConfig {
    /// Marketplace search and autocomplete settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Guided sync settings
    #[serde(default)]
    pub sync: SyncConfig,

    /// Editor selection defaults
    #[serde(default)]
    pub editors: EditorsConfig,
}

/// Autocomplete timing and limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SearchConfig {
    /// Quiet period before suggestions are fetched
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Trimmed query length below which no suggestions are fetched
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Maximum number of suggestions shown
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Guided sync settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SyncConfig {
    /// How long the sync report stays visible before the orchestrator resets
    #[serde(default = "default_reset_delay_ms")]
    pub reset_delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reset_delay_ms: default_reset_delay_ms(),
        }
    }
}

impl SyncConfig {
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}

/// Editor selection defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EditorsConfig {
    /// Editor used as sync source and audit context at startup
    #[serde(default = "default_source")]
    pub default_source: EditorId,
}

impl Default for EditorsConfig {
    fn default() -> Self {
        Self {
            default_source: default_source(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_suggestion_limit() -> usize {
    8
}

fn default_reset_delay_ms() -> u64 {
    100
}

fn default_source() -> EditorId {
    EditorId::from(editor_ids::VSCODE)
}
