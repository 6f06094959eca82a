//! # vsynx-core
//!
//! Core library for vsynx providing:
//! - Data model for editors, extensions, audits and sync reports
//! - The extension-management backend contract and a snapshot backend
//! - Layered session configuration (embedded defaults, user file, environment)

pub mod backend;
pub mod config;
pub mod error;
pub mod types;

pub use backend::{ExtensionBackend, SnapshotBackend};
pub use config::SessionConfigLoader;
pub use error::{Error, Result};
