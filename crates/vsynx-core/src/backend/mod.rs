//! Extension-management backend contract
//!
//! The orchestration layer never touches editor directories, registries or
//! CLIs itself. Every such request goes through [`ExtensionBackend`], one
//! request/response call per operation. A rejected call carries a
//! human-readable message in [`Error::Backend`](crate::Error::Backend).

mod snapshot;

pub use snapshot::{EditorSnapshot, Snapshot, SnapshotBackend};

use crate::error::Result;
use crate::types::{
    AuditReport, CliStatus, EditorId, EditorProfile, EditorStatus, ExtensionMetadata,
    ExtensionRecord, SyncReport, SyncRequest, ValidationResult,
};
use async_trait::async_trait;

/// Backend operations consumed by the session controllers
#[async_trait]
pub trait ExtensionBackend: Send + Sync {
    /// Backend name for log messages
    fn name(&self) -> &'static str;

    /// List the extensions installed in an editor
    async fn list_extensions(&self, editor: &EditorId) -> Result<Vec<ExtensionRecord>>;

    /// Validate one extension against the public registries
    async fn validate_extension(&self, extension_id: &str) -> Result<ValidationResult>;

    /// Validate every extension found under an extensions directory
    async fn audit_extensions(&self, extensions_dir: &str) -> Result<AuditReport>;

    /// Keyword search against the marketplace
    async fn search_marketplace(&self, keyword: &str) -> Result<Vec<ExtensionMetadata>>;

    /// Known editor profiles
    async fn editor_profiles(&self) -> Result<Vec<EditorProfile>>;

    /// Live status of every known editor
    async fn editor_statuses(&self) -> Result<Vec<EditorStatus>>;

    /// Availability of the `code`-style CLIs
    async fn cli_status(&self) -> Result<CliStatus>;

    /// Install one extension with the given CLI command
    async fn install_via_cli(&self, cli_command: &str, extension_id: &str) -> Result<()>;

    /// Copy extensions from the source editor to every target editor
    async fn execute_sync(&self, request: &SyncRequest) -> Result<SyncReport>;

    /// Ids among `extension_ids` that already exist in `target`
    async fn detect_conflicts(
        &self,
        source: &EditorId,
        target: &EditorId,
        extension_ids: &[String],
    ) -> Result<Vec<String>>;
}
