//! # vsynx-session
//!
//! Client-side orchestration of editor extension workflows:
//! - Editor directory and lazily-loaded target inventories
//! - Cancellable audit sessions with a per-editor report cache
//! - Guided multi-target sync with a conflict pre-flight
//! - Debounced marketplace search and autocomplete
//! - Install-then-sync shortcut
//!
//! Every controller is a cheap `Clone` handle over shared state. Locks are
//! never held across a backend call.

pub mod audit;
pub mod directory;
pub mod install_sync;
pub mod inventory;
pub mod notice;
pub mod search;
pub mod selection;
pub mod session;
pub mod sync;

#[cfg(test)]
mod test_support;

pub use audit::{AuditOutcome, AuditSession};
pub use directory::EditorDirectory;
pub use install_sync::InstallSync;
pub use inventory::{InventoryCache, InventoryState};
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use search::{NavKey, SearchController};
pub use selection::{CandidateFilter, SelectionSet, ViewMode};
pub use session::Session;
pub use sync::{ConflictResolution, SyncOrchestrator, SyncOutcome, SyncPhase, TargetPreview};
