//! In-memory backend built from a YAML snapshot
//!
//! Holds editors with their inventories, CLI availability, trust verdicts and
//! a marketplace catalog. Sync and install mutate the in-memory inventories,
//! so a session driven against it behaves like one against the real backend.

use super::ExtensionBackend;
use crate::error::{Error, Result};
use crate::types::{
    AuditReport, CliFlavor, CliStatus, EditorId, EditorProfile, EditorStatus, ExtensionId,
    ExtensionMetadata, ExtensionRecord, SyncReport, SyncRequest, SyncResult, TrustLevel,
    ValidationResult,
};
use async_trait::async_trait;
use camino::Utf8Path;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

/// One editor and its installed extensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub profile: EditorProfile,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub extensions: Vec<ExtensionRecord>,
}

fn default_available() -> bool {
    true
}

impl EditorSnapshot {
    fn contains(&self, id: &ExtensionId) -> bool {
        self.extensions.iter().any(|e| &e.id == id)
    }

    fn find(&self, id: &ExtensionId) -> Option<&ExtensionRecord> {
        self.extensions.iter().find(|e| &e.id == id)
    }

    fn upsert(&mut self, record: ExtensionRecord) {
        self.extensions.retain(|e| e.id != record.id);
        self.extensions.push(record);
    }
}

/// Complete backend state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub editors: Vec<EditorSnapshot>,
    #[serde(default)]
    pub cli: CliStatus,
    /// Trust verdict per extension id; ids without a verdict validate as Unknown
    #[serde(default)]
    pub verdicts: BTreeMap<String, TrustLevel>,
    #[serde(default)]
    pub marketplace: Vec<ExtensionMetadata>,
}

impl Snapshot {
    fn editor(&self, id: &EditorId) -> Option<&EditorSnapshot> {
        self.editors.iter().find(|e| &e.profile.id == id)
    }

    fn editor_mut(&mut self, id: &EditorId) -> Option<&mut EditorSnapshot> {
        self.editors.iter_mut().find(|e| &e.profile.id == id)
    }

    fn verdict(&self, id: &str) -> TrustLevel {
        self.verdicts
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(id))
            .map(|(_, level)| *level)
            .unwrap_or_default()
    }

    fn catalog_entry(&self, id: &str) -> Option<&ExtensionMetadata> {
        self.marketplace
            .iter()
            .find(|m| m.id.eq_ignore_ascii_case(id))
    }

    fn validate(&self, id: &str) -> ValidationResult {
        let level = self.verdict(id);
        let mut result = ValidationResult::new(id, level);
        result.marketplace_data = self.catalog_entry(id).cloned();
        result.recommendation = recommendation(level).to_string();
        result
    }
}

fn recommendation(level: TrustLevel) -> &'static str {
    match level {
        TrustLevel::Legitimate => "Extension matches the official registry",
        TrustLevel::Suspicious => "Review differences before trusting this extension",
        TrustLevel::Malicious => "Uninstall this extension immediately",
        TrustLevel::Unknown => "Extension could not be verified",
    }
}

/// Backend serving a [`Snapshot`] from memory
pub struct SnapshotBackend {
    state: RwLock<Snapshot>,
}

impl SnapshotBackend {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    /// Parse a snapshot from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_yaml_ng::from_str(content)?;
        Ok(Self::new(snapshot))
    }

    /// Load a snapshot file
    pub fn load(path: &Utf8Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::config_not_found(path.as_str()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl ExtensionBackend for SnapshotBackend {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    async fn list_extensions(&self, editor: &EditorId) -> Result<Vec<ExtensionRecord>> {
        let state = self.state.read().await;
        let snapshot = state
            .editor(editor)
            .ok_or_else(|| Error::backend("list extensions", format!("unknown editor type: {}", editor)))?;
        if !snapshot.available {
            return Err(Error::backend(
                "list extensions",
                format!("extensions directory not found: {}", snapshot.profile.extensions_dir),
            ));
        }
        Ok(snapshot.extensions.clone())
    }

    async fn validate_extension(&self, extension_id: &str) -> Result<ValidationResult> {
        let state = self.state.read().await;
        Ok(state.validate(extension_id))
    }

    async fn audit_extensions(&self, extensions_dir: &str) -> Result<AuditReport> {
        let state = self.state.read().await;
        let editor = state
            .editors
            .iter()
            .find(|e| e.available && e.profile.extensions_dir == extensions_dir)
            .ok_or_else(|| {
                Error::backend(
                    "audit extensions",
                    format!("could not read extensions directory: {}", extensions_dir),
                )
            })?;

        let results = editor
            .extensions
            .iter()
            .map(|ext| state.validate(ext.id.as_str()))
            .collect();
        Ok(AuditReport::from_results(results, Utc::now()))
    }

    async fn search_marketplace(&self, keyword: &str) -> Result<Vec<ExtensionMetadata>> {
        let keyword = keyword.trim().to_lowercase();
        let state = self.state.read().await;
        if keyword == "*" {
            return Ok(state.marketplace.clone());
        }
        Ok(state
            .marketplace
            .iter()
            .filter(|m| {
                m.id.to_lowercase().contains(&keyword)
                    || m.display_name.to_lowercase().contains(&keyword)
                    || m.description.to_lowercase().contains(&keyword)
            })
            .cloned()
            .collect())
    }

    async fn editor_profiles(&self) -> Result<Vec<EditorProfile>> {
        let state = self.state.read().await;
        Ok(state.editors.iter().map(|e| e.profile.clone()).collect())
    }

    async fn editor_statuses(&self) -> Result<Vec<EditorStatus>> {
        let state = self.state.read().await;
        Ok(state
            .editors
            .iter()
            .map(|e| {
                if !e.available {
                    return EditorStatus::unavailable(
                        e.profile.clone(),
                        format!("Extensions directory not found: {}", e.profile.extensions_dir),
                    );
                }
                let cli_path = CliFlavor::for_editor(&e.profile.id)
                    .and_then(|flavor| state.cli.path(flavor))
                    .map(str::to_string);
                EditorStatus {
                    editor: e.profile.clone(),
                    is_available: true,
                    extension_count: e.extensions.len(),
                    disabled_reason: None,
                    cli_available: cli_path.is_some(),
                    cli_path,
                }
            })
            .collect())
    }

    async fn cli_status(&self) -> Result<CliStatus> {
        Ok(self.state.read().await.cli.clone())
    }

    async fn install_via_cli(&self, cli_command: &str, extension_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let flavor = CliFlavor::ALL
            .into_iter()
            .find(|f| f.command() == cli_command && state.cli.is_available(*f))
            .ok_or_else(|| {
                Error::backend("install extension", format!("CLI command '{}' not found", cli_command))
            })?;

        let entry = state.catalog_entry(extension_id).cloned().ok_or_else(|| {
            Error::backend(
                "install extension",
                format!("Extension '{}' not found in marketplace", extension_id),
            )
        })?;

        let editor = state.editor_mut(&flavor.editor_id()).ok_or_else(|| {
            Error::backend(
                "install extension",
                format!("no editor profile for {}", flavor.editor_id()),
            )
        })?;
        editor.available = true;
        editor.upsert(ExtensionRecord::new(entry.id, entry.version));
        debug!("Installed {} via {}", extension_id, cli_command);
        Ok(())
    }

    async fn execute_sync(&self, request: &SyncRequest) -> Result<SyncReport> {
        let mut state = self.state.write().await;
        let source = state
            .editor(&request.source_editor)
            .ok_or_else(|| {
                Error::backend(
                    "sync extensions",
                    format!("invalid source editor: {}", request.source_editor),
                )
            })?
            .clone();
        if !source.available {
            return Err(Error::backend(
                "sync extensions",
                format!(
                    "source editor not available: extensions directory not found: {}",
                    source.profile.extensions_dir
                ),
            ));
        }

        let mut results = Vec::with_capacity(request.target_editors.len());
        for target_id in &request.target_editors {
            let mut result = SyncResult::new(target_id.clone());
            let Some(target) = state.editor_mut(target_id) else {
                result
                    .errors
                    .push(format!("Invalid target editor: unknown editor type: {}", target_id));
                results.push(result);
                continue;
            };
            target.available = true;

            for raw_id in &request.extension_ids {
                let id = ExtensionId::from(raw_id.as_str());
                let Some(record) = source.find(&id) else {
                    result
                        .errors
                        .push(format!("Extension {} not found in source index", raw_id));
                    continue;
                };

                if target.contains(&id) {
                    result.conflicts.push(raw_id.clone());
                    if !request.overwrite_conflicts {
                        result.skipped_count += 1;
                        continue;
                    }
                    result.overwritten_count += 1;
                }
                target.upsert(record.clone());
                result.copied_count += 1;
            }

            result.success = result.errors.is_empty();
            results.push(result);
        }

        Ok(SyncReport::from_results(request.source_editor.clone(), results))
    }

    async fn detect_conflicts(
        &self,
        _source: &EditorId,
        target: &EditorId,
        extension_ids: &[String],
    ) -> Result<Vec<String>> {
        let state = self.state.read().await;
        let target = state.editor(target).ok_or_else(|| {
            Error::backend("detect conflicts", format!("unknown editor type: {}", target))
        })?;
        Ok(extension_ids
            .iter()
            .filter(|id| target.contains(&ExtensionId::from(id.as_str())))
            .cloned()
            .collect())
    }
}
