//! Editor directory: profiles, live availability and CLI status

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use vsynx_core::types::{CliFlavor, CliStatus, EditorId, EditorProfile, EditorStatus};
use vsynx_core::{Error, ExtensionBackend, Result};

#[derive(Debug, Default)]
struct DirectoryState {
    profiles: Vec<EditorProfile>,
    statuses: BTreeMap<EditorId, EditorStatus>,
    cli: CliStatus,
    install_target: Option<CliFlavor>,
}

impl DirectoryState {
    fn status_for(&self, profile: &EditorProfile) -> EditorStatus {
        self.statuses
            .get(&profile.id)
            .cloned()
            .unwrap_or_else(|| EditorStatus::unavailable(profile.clone(), "No status reported"))
    }
}

/// Cloneable handle to the known editors
#[derive(Clone)]
pub struct EditorDirectory {
    backend: Arc<dyn ExtensionBackend>,
    state: Arc<RwLock<DirectoryState>>,
}

impl EditorDirectory {
    /// Fetch profiles, statuses and CLI status once
    pub async fn load(backend: Arc<dyn ExtensionBackend>) -> Result<Self> {
        let profiles = backend.editor_profiles().await?;
        let directory = Self {
            backend,
            state: Arc::new(RwLock::new(DirectoryState {
                profiles,
                ..Default::default()
            })),
        };
        directory.reload().await?;
        Ok(directory)
    }

    /// A directory with no editors, used when the backend cannot list them
    pub fn empty(backend: Arc<dyn ExtensionBackend>) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(DirectoryState::default())),
        }
    }

    /// Re-fetch statuses and CLI availability; profiles never change
    pub async fn reload(&self) -> Result<()> {
        let statuses = self.backend.editor_statuses().await?;
        let cli = self.backend.cli_status().await?;

        let mut state = self.state.write().await;
        state.statuses = statuses
            .into_iter()
            .map(|s| (s.editor.id.clone(), s))
            .collect();
        if !state
            .install_target
            .is_some_and(|flavor| cli.is_available(flavor))
        {
            state.install_target = cli.preferred();
        }
        state.cli = cli;

        let available = state.statuses.values().filter(|s| s.is_available).count();
        info!(
            "Loaded {} editors ({} available) from {} backend",
            state.profiles.len(),
            available,
            self.backend.name()
        );
        Ok(())
    }

    pub async fn profiles(&self) -> Vec<EditorProfile> {
        self.state.read().await.profiles.clone()
    }

    pub async fn profile(&self, id: &EditorId) -> Option<EditorProfile> {
        let state = self.state.read().await;
        state.profiles.iter().find(|p| &p.id == id).cloned()
    }

    pub async fn status(&self, id: &EditorId) -> Option<EditorStatus> {
        let state = self.state.read().await;
        state
            .profiles
            .iter()
            .find(|p| &p.id == id)
            .map(|p| state.status_for(p))
    }

    /// Statuses in profile order
    pub async fn statuses(&self) -> Vec<EditorStatus> {
        let state = self.state.read().await;
        state.profiles.iter().map(|p| state.status_for(p)).collect()
    }

    pub async fn is_available(&self, id: &EditorId) -> bool {
        self.status(id).await.is_some_and(|s| s.is_available)
    }

    pub async fn vscode_family(&self) -> Vec<EditorProfile> {
        let state = self.state.read().await;
        state
            .profiles
            .iter()
            .filter(|p| p.is_vscode_family())
            .cloned()
            .collect()
    }

    pub async fn clones(&self) -> Vec<EditorProfile> {
        let state = self.state.read().await;
        state
            .profiles
            .iter()
            .filter(|p| !p.is_vscode_family())
            .cloned()
            .collect()
    }

    pub async fn cli_status(&self) -> CliStatus {
        self.state.read().await.cli.clone()
    }

    /// CLI command for an editor, only when its flavor is installed
    pub async fn cli_command_for(&self, id: &EditorId) -> Option<&'static str> {
        let flavor = CliFlavor::for_editor(id)?;
        let state = self.state.read().await;
        state.cli.is_available(flavor).then(|| flavor.command())
    }

    pub async fn install_target(&self) -> Option<CliFlavor> {
        self.state.read().await.install_target
    }

    /// Choose the editor that CLI installs go into
    pub async fn set_install_target(&self, flavor: CliFlavor) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.cli.is_available(flavor) {
            return Err(Error::validation(format!(
                "CLI not available for {}",
                flavor.editor_id()
            )));
        }
        debug!("Install target set to {}", flavor.editor_id());
        state.install_target = Some(flavor);
        Ok(())
    }

    /// Profile of an editor that may be used as a source or target
    pub async fn require_available(&self, id: &EditorId) -> Result<EditorProfile> {
        let status = self
            .status(id)
            .await
            .ok_or_else(|| Error::unknown_editor(id.as_str()))?;
        if !status.is_available {
            let reason = status
                .disabled_reason
                .unwrap_or_else(|| "not installed".to_string());
            return Err(Error::validation(format!(
                "{} is not available: {}",
                status.editor.name, reason
            )));
        }
        Ok(status.editor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_backend;

    #[tokio::test]
    async fn test_load_splits_families() {
        let directory = EditorDirectory::load(fixture_backend()).await.unwrap();
        assert_eq!(directory.profiles().await.len(), 5);
        assert_eq!(directory.vscode_family().await.len(), 2);
        assert_eq!(directory.clones().await.len(), 3);
    }

    #[tokio::test]
    async fn test_availability_and_unknown_editors() {
        let directory = EditorDirectory::load(fixture_backend()).await.unwrap();
        assert!(directory.is_available(&EditorId::from("vscode")).await);
        assert!(!directory.is_available(&EditorId::from("cursor")).await);
        assert!(!directory.is_available(&EditorId::from("zed")).await);

        let err = directory
            .require_available(&EditorId::from("zed"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownEditor { .. }));
        let err = directory
            .require_available(&EditorId::from("cursor"))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_install_target_defaults_to_first_available_cli() {
        let directory = EditorDirectory::load(fixture_backend()).await.unwrap();
        assert_eq!(directory.install_target().await, Some(CliFlavor::Code));
        assert_eq!(
            directory.cli_command_for(&EditorId::from("vscode")).await,
            Some("code")
        );
        assert_eq!(
            directory.cli_command_for(&EditorId::from("vscodium")).await,
            None
        );
        assert!(directory
            .set_install_target(CliFlavor::Codium)
            .await
            .unwrap_err()
            .is_validation());
    }
}
