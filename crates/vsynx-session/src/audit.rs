//! Audit session controller
//!
//! Runs at most one audit at a time and caches one report per editor.
//! Cancellation is cooperative: each run holds a ticket, and a completion
//! whose ticket is no longer active is discarded without touching state.

use crate::directory::EditorDirectory;
use crate::notice::NoticeBoard;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use vsynx_core::types::{AuditReport, EditorId, ExtensionRecord, ValidationResult};
use vsynx_core::{Error, ExtensionBackend, Result};

/// What happened to a finished audit request
#[derive(Debug, Clone, PartialEq)]
pub enum AuditOutcome {
    /// The report was stored as current and cached
    Completed(AuditReport),
    /// The run was cancelled or superseded; its result was dropped
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket(u64);

#[derive(Debug)]
struct AuditState {
    current_editor: EditorId,
    running: Option<(EditorId, Ticket)>,
    next_ticket: u64,
    report: Option<AuditReport>,
    cache: HashMap<EditorId, AuditReport>,
    extensions: Vec<ExtensionRecord>,
    extensions_loading: bool,
    validation: Option<ValidationResult>,
    validating: bool,
}

/// Cloneable handle to the audit session
#[derive(Clone)]
pub struct AuditSession {
    backend: Arc<dyn ExtensionBackend>,
    directory: EditorDirectory,
    notices: NoticeBoard,
    state: Arc<RwLock<AuditState>>,
}

impl AuditSession {
    pub fn new(
        backend: Arc<dyn ExtensionBackend>,
        directory: EditorDirectory,
        notices: NoticeBoard,
        initial_editor: EditorId,
    ) -> Self {
        Self {
            backend,
            directory,
            notices,
            state: Arc::new(RwLock::new(AuditState {
                current_editor: initial_editor,
                running: None,
                next_ticket: 0,
                report: None,
                cache: HashMap::new(),
                extensions: Vec::new(),
                extensions_loading: false,
                validation: None,
                validating: false,
            })),
        }
    }

    /// Audit an editor, making it the current context
    ///
    /// Fails with `InvalidState` while another editor's audit is running.
    /// A second start for the same editor supersedes the running one.
    pub async fn start(&self, editor: &EditorId) -> Result<AuditOutcome> {
        let profile = match self.directory.require_available(editor).await {
            Ok(profile) => profile,
            Err(e) => {
                self.notices.post_error(e.to_string()).await;
                return Err(e);
            }
        };

        let claimed = {
            let mut state = self.state.write().await;
            let other = state
                .running
                .as_ref()
                .map(|(running, _)| running.clone())
                .filter(|running| running != editor);
            if let Some(other) = other {
                Err(Error::invalid_state(format!(
                    "an audit of {} is already running",
                    other
                )))
            } else {
                if state.running.is_some() {
                    debug!("Superseding running audit of {}", editor);
                }
                if &state.current_editor != editor {
                    state.current_editor = editor.clone();
                    state.report = state.cache.get(editor).cloned();
                }
                state.next_ticket += 1;
                let ticket = Ticket(state.next_ticket);
                state.running = Some((editor.clone(), ticket));
                Ok(ticket)
            }
        };
        let ticket = match claimed {
            Ok(ticket) => ticket,
            Err(e) => {
                self.notices.post_error(e.to_string()).await;
                return Err(e);
            }
        };
        self.notices.clear_error().await;

        info!("Auditing {} at {}", editor, profile.extensions_dir);
        let result = self.backend.audit_extensions(&profile.extensions_dir).await;

        let mut state = self.state.write().await;
        if state.running.as_ref() != Some(&(editor.clone(), ticket)) {
            debug!("Discarding audit result for {} (cancelled)", editor);
            return Ok(AuditOutcome::Discarded);
        }
        state.running = None;

        match result {
            Ok(report) => {
                info!(
                    "Audit of {} complete: {} extensions, {} malicious, {} suspicious",
                    editor,
                    report.total_extensions,
                    report.malicious_count,
                    report.suspicious_count
                );
                state.cache.insert(editor.clone(), report.clone());
                state.report = Some(report.clone());
                Ok(AuditOutcome::Completed(report))
            }
            Err(e) => {
                drop(state);
                self.notices.post_error(e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Stop waiting for the running audit; returns false when none was running
    pub async fn cancel(&self) -> bool {
        let mut state = self.state.write().await;
        match state.running.take() {
            Some((editor, _)) => {
                info!("Audit of {} cancelled", editor);
                true
            }
            None => false,
        }
    }

    /// Change the current editor
    ///
    /// Cancels a running audit, restores the cached report for `editor` (or
    /// none) and reloads the extension list. Audits never rerun implicitly.
    pub async fn switch_editor(&self, editor: &EditorId) -> Result<()> {
        self.cancel().await;
        {
            let mut state = self.state.write().await;
            state.current_editor = editor.clone();
            state.report = state.cache.get(editor).cloned();
            state.validation = None;
            state.extensions.clear();
        }
        debug!("Current editor is now {}", editor);
        self.refresh_extensions().await
    }

    /// Reload the installed extensions of the current editor
    pub async fn refresh_extensions(&self) -> Result<()> {
        let editor = {
            let mut state = self.state.write().await;
            state.extensions_loading = true;
            state.current_editor.clone()
        };

        let result = self.backend.list_extensions(&editor).await;

        let mut state = self.state.write().await;
        if state.current_editor != editor {
            return Ok(());
        }
        state.extensions_loading = false;
        match result {
            Ok(extensions) => {
                state.extensions = extensions;
                Ok(())
            }
            Err(e) => {
                state.extensions.clear();
                drop(state);
                self.notices.post_error(e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Validate a single extension for the list view
    pub async fn validate_extension(&self, extension_id: &str) -> Result<ValidationResult> {
        {
            let mut state = self.state.write().await;
            state.validating = true;
            state.validation = None;
        }

        let result = self.backend.validate_extension(extension_id).await;

        let mut state = self.state.write().await;
        state.validating = false;
        match result {
            Ok(validation) => {
                state.validation = Some(validation.clone());
                Ok(validation)
            }
            Err(e) => {
                drop(state);
                self.notices.post_error(e.to_string()).await;
                Err(e)
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        self.state.read().await.running.is_some()
    }

    pub async fn running_editor(&self) -> Option<EditorId> {
        self.state
            .read()
            .await
            .running
            .as_ref()
            .map(|(editor, _)| editor.clone())
    }

    pub async fn current_editor(&self) -> EditorId {
        self.state.read().await.current_editor.clone()
    }

    /// Report displayed for the current editor
    pub async fn report(&self) -> Option<AuditReport> {
        self.state.read().await.report.clone()
    }

    pub async fn cached_report(&self, editor: &EditorId) -> Option<AuditReport> {
        self.state.read().await.cache.get(editor).cloned()
    }

    pub async fn cached_count(&self) -> usize {
        self.state.read().await.cache.len()
    }

    pub async fn extensions(&self) -> Vec<ExtensionRecord> {
        self.state.read().await.extensions.clone()
    }

    pub async fn is_loading_extensions(&self) -> bool {
        self.state.read().await.extensions_loading
    }

    pub async fn validation(&self) -> Option<ValidationResult> {
        self.state.read().await.validation.clone()
    }

    pub async fn is_validating(&self) -> bool {
        self.state.read().await.validating
    }
}
