//! Command implementations

pub mod audit;
pub mod editors;
pub mod install;
pub mod list;
pub mod search;
pub mod sync;
pub mod validate;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;
use vsynx_core::types::EditorId;
use vsynx_core::{SessionConfigLoader, SnapshotBackend};
use vsynx_session::Session;

use crate::cli::Cli;
use crate::output;

/// Load configuration and the backend snapshot, then start a session
pub async fn open_session(cli: &Cli) -> Result<Session> {
    let loader = match &cli.config_dir {
        Some(dir) => SessionConfigLoader::with_dir(dir.clone()),
        None => SessionConfigLoader::new()?,
    };
    let config = loader.load().context("Failed to load session configuration")?;
    debug!("Configuration loaded from {}", loader.config_dir());

    let backend = SnapshotBackend::load(&cli.snapshot)
        .with_context(|| format!("Failed to load backend snapshot {}", cli.snapshot))?;

    let session = Session::start(Arc::new(backend), config).await;
    if let Some(notice) = session.notices().current().await {
        if notice.is_error() {
            output::warning(&notice.message);
        }
    }
    Ok(session)
}

/// Resolve an optional editor argument against the configured default source
pub fn editor_or_default(editor: Option<&str>, session: &Session) -> EditorId {
    editor
        .map(EditorId::from)
        .unwrap_or_else(|| session.config().editors.default_source.clone())
}
