//! Session facade wiring every controller to one backend

use crate::audit::AuditSession;
use crate::directory::EditorDirectory;
use crate::install_sync::InstallSync;
use crate::inventory::InventoryCache;
use crate::notice::NoticeBoard;
use crate::search::SearchController;
use crate::sync::SyncOrchestrator;
use std::sync::Arc;
use tracing::{info, warn};
use vsynx_core::types::SessionConfig;
use vsynx_core::ExtensionBackend;

/// One client session: shared notices, editor directory and the controllers
#[derive(Clone)]
pub struct Session {
    config: SessionConfig,
    notices: NoticeBoard,
    directory: EditorDirectory,
    audit: AuditSession,
    sync: SyncOrchestrator,
    search: SearchController,
    install_sync: InstallSync,
}

impl Session {
    /// Load the editor directory and select the configured default source
    ///
    /// Startup never fails. An unreachable directory or an unavailable or
    /// unreadable default source leaves the session running without a sync
    /// source, with the failure posted as a notice.
    pub async fn start(backend: Arc<dyn ExtensionBackend>, config: SessionConfig) -> Self {
        let notices = NoticeBoard::new();
        let directory = match EditorDirectory::load(backend.clone()).await {
            Ok(directory) => directory,
            Err(e) => {
                warn!("Failed to load editors: {}", e);
                notices
                    .post_error(format!("Failed to load editors: {}", e))
                    .await;
                EditorDirectory::empty(backend.clone())
            }
        };
        let default_source = config.editors.default_source.clone();

        let audit = AuditSession::new(
            backend.clone(),
            directory.clone(),
            notices.clone(),
            default_source.clone(),
        );
        let sync = SyncOrchestrator::new(
            backend.clone(),
            directory.clone(),
            InventoryCache::new(backend.clone()),
            notices.clone(),
            config.sync.clone(),
        );
        let search = SearchController::new(backend.clone(), notices.clone(), config.search.clone());
        let install_sync = InstallSync::new(backend.clone(), directory.clone(), notices.clone());

        let session = Self {
            config,
            notices,
            directory,
            audit,
            sync,
            search,
            install_sync,
        };

        if session.directory.is_available(&default_source).await {
            if let Err(e) = session.sync.set_source(&default_source).await {
                warn!("Could not load default source {}: {}", default_source, e);
            } else if let Err(e) = session.audit.refresh_extensions().await {
                warn!("Could not list extensions of {}: {}", default_source, e);
            }
        } else {
            warn!("Default source {} is not available", default_source);
        }
        info!("Session started against {} backend", backend.name());
        session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn directory(&self) -> &EditorDirectory {
        &self.directory
    }

    pub fn audit(&self) -> &AuditSession {
        &self.audit
    }

    pub fn sync(&self) -> &SyncOrchestrator {
        &self.sync
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn install_sync(&self) -> &InstallSync {
        &self.install_sync
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_backend;
    use vsynx_core::types::EditorId;

    #[tokio::test]
    async fn test_start_selects_default_source() {
        let session = Session::start(fixture_backend(), SessionConfig::default()).await;
        assert_eq!(session.sync().source().await, Some(EditorId::from("vscode")));
        assert_eq!(session.sync().candidates().await.len(), 3);
        assert_eq!(session.audit().extensions().await.len(), 3);
        assert!(session.notices().current().await.is_none());
    }

    #[tokio::test]
    async fn test_unavailable_default_source_is_tolerated() {
        let mut config = SessionConfig::default();
        config.editors.default_source = EditorId::from("cursor");
        let session = Session::start(fixture_backend(), config).await;
        assert!(session.sync().source().await.is_none());
    }
}
