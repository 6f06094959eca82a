//! Install a marketplace extension via CLI, then sync it to other editors
//!
//! The two phases are not transactional. A failed install stops before any
//! sync; a failed sync leaves the installation in place. The sync phase
//! always overwrites existing copies in the targets.

use crate::directory::EditorDirectory;
use crate::notice::NoticeBoard;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use vsynx_core::types::{CliFlavor, EditorId, ExtensionMetadata, SyncReport, SyncRequest};
use vsynx_core::{Error, ExtensionBackend, Result};

#[derive(Debug, Default)]
struct InstallState {
    targets: BTreeSet<EditorId>,
    installing: bool,
    last_report: Option<SyncReport>,
}

/// Cloneable handle to the install+sync workflow
#[derive(Clone)]
pub struct InstallSync {
    backend: Arc<dyn ExtensionBackend>,
    directory: EditorDirectory,
    notices: NoticeBoard,
    state: Arc<RwLock<InstallState>>,
}

/// Message of a backend rejection without the operation prefix
fn verbatim(error: Error) -> String {
    match error {
        Error::Backend { message, .. } => message,
        other => other.to_string(),
    }
}

impl InstallSync {
    pub fn new(
        backend: Arc<dyn ExtensionBackend>,
        directory: EditorDirectory,
        notices: NoticeBoard,
    ) -> Self {
        Self {
            backend,
            directory,
            notices,
            state: Arc::new(RwLock::new(InstallState::default())),
        }
    }

    async fn fail<T>(&self, error: Error) -> Result<T> {
        self.notices.post_error(error.to_string()).await;
        Err(error)
    }

    /// Add or remove a sync target; returns true when now selected
    pub async fn toggle_target(&self, editor: &EditorId) -> Result<bool> {
        if self.state.write().await.targets.remove(editor) {
            return Ok(false);
        }
        if let Err(e) = self.directory.require_available(editor).await {
            return self.fail(e).await;
        }
        self.state.write().await.targets.insert(editor.clone());
        Ok(true)
    }

    pub async fn clear_targets(&self) {
        self.state.write().await.targets.clear();
    }

    pub async fn targets(&self) -> Vec<EditorId> {
        self.state.read().await.targets.iter().cloned().collect()
    }

    pub async fn is_installing(&self) -> bool {
        self.state.read().await.installing
    }

    pub async fn last_report(&self) -> Option<SyncReport> {
        self.state.read().await.last_report.clone()
    }

    async fn install_flavor(&self) -> Result<CliFlavor> {
        let cli = self.directory.cli_status().await;
        if !cli.any_available() {
            return Err(Error::validation(
                "No VS Code CLI available. Install VS Code and make sure the \"code\" command is in PATH.",
            ));
        }
        let flavor = self
            .directory
            .install_target()
            .await
            .ok_or_else(|| Error::validation("No install target selected"))?;
        if !cli.is_available(flavor) {
            return Err(Error::validation(format!(
                "CLI not available for {}",
                flavor.editor_id()
            )));
        }
        Ok(flavor)
    }

    /// Install one extension into the install target editor
    pub async fn install(&self, extension: &ExtensionMetadata) -> Result<()> {
        let flavor = match self.install_flavor().await {
            Ok(flavor) => flavor,
            Err(e) => return self.fail(e).await,
        };
        self.notices.clear_error().await;
        self.state.write().await.installing = true;

        info!("Installing {} via {}", extension.id, flavor.command());
        let result = self
            .backend
            .install_via_cli(flavor.command(), &extension.id)
            .await;
        self.state.write().await.installing = false;

        match result {
            Ok(()) => {
                self.notices
                    .post_info(format!(
                        "Successfully installed {} to {}",
                        extension.id,
                        flavor.editor_id()
                    ))
                    .await;
                self.refresh_directory().await;
                Ok(())
            }
            Err(e) => self.fail(Error::install(verbatim(e))).await,
        }
    }

    /// Install `selected` via CLI, then sync it to every chosen target with overwrite
    ///
    /// Preconditions, in order: a selected result, any CLI, at least one
    /// target, a CLI for the install target.
    pub async fn install_and_sync(&self, selected: Option<&ExtensionMetadata>) -> Result<SyncReport> {
        let Some(extension) = selected else {
            return self
                .fail(Error::validation("Please select an extension first"))
                .await;
        };
        if !self.directory.cli_status().await.any_available() {
            return self
                .fail(Error::validation("No VS Code CLI available"))
                .await;
        }
        let targets = self.targets().await;
        if targets.is_empty() {
            return self
                .fail(Error::validation("Please select at least one target editor"))
                .await;
        }
        let flavor = match self.install_flavor().await {
            Ok(flavor) => flavor,
            Err(e) => return self.fail(e).await,
        };

        self.notices.clear_error().await;
        self.state.write().await.installing = true;
        let outcome = self.run_phases(flavor, extension, targets).await;
        self.state.write().await.installing = false;

        let report = match outcome {
            Ok(report) => report,
            Err(e) => return self.fail(e).await,
        };

        if report.has_errors() {
            self.notices
                .post_error(format!(
                    "Installed and synced with {} errors",
                    report.total_errors
                ))
                .await;
        } else {
            self.notices
                .post_info(format!(
                    "Successfully installed {} and synced to {} target(s)",
                    extension.id, report.total_copied
                ))
                .await;
        }
        {
            let mut state = self.state.write().await;
            state.last_report = Some(report.clone());
            state.targets.clear();
        }
        self.refresh_directory().await;
        Ok(report)
    }

    async fn run_phases(
        &self,
        flavor: CliFlavor,
        extension: &ExtensionMetadata,
        targets: Vec<EditorId>,
    ) -> Result<SyncReport> {
        info!(
            "Install+Sync: installing {} via {}",
            extension.id,
            flavor.command()
        );
        self.backend
            .install_via_cli(flavor.command(), &extension.id)
            .await
            .map_err(|e| Error::install(verbatim(e)))?;

        debug!("Install+Sync: syncing {} to {:?}", extension.id, targets);
        let request = SyncRequest {
            source_editor: flavor.editor_id(),
            target_editors: targets,
            extension_ids: vec![extension.id.clone()],
            overwrite_conflicts: true,
        };
        self.backend
            .execute_sync(&request)
            .await
            .map_err(|e| Error::post_install_sync(&extension.id, verbatim(e)))
    }

    async fn refresh_directory(&self) {
        if let Err(e) = self.directory.reload().await {
            warn!("Failed to refresh editor statuses: {}", e);
        }
    }
}
