//! User-visible notices shared by every controller
//!
//! A single dismissible slot: posting a notice replaces the previous one.

use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Info,
}

/// One message waiting to be read or dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Cloneable handle to the shared notice slot
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    slot: Arc<RwLock<Option<Notice>>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn post_error(&self, message: impl Into<String>) {
        self.post(NoticeKind::Error, message.into()).await;
    }

    pub async fn post_info(&self, message: impl Into<String>) {
        self.post(NoticeKind::Info, message.into()).await;
    }

    async fn post(&self, kind: NoticeKind, message: String) {
        debug!("Notice ({:?}): {}", kind, message);
        *self.slot.write().await = Some(Notice { kind, message });
    }

    pub async fn current(&self) -> Option<Notice> {
        self.slot.read().await.clone()
    }

    pub async fn dismiss(&self) {
        *self.slot.write().await = None;
    }

    /// Drop a stale error before a new attempt; info notices stay
    pub async fn clear_error(&self) {
        let mut slot = self.slot.write().await;
        if slot.as_ref().is_some_and(Notice::is_error) {
            *slot = None;
        }
    }
}
