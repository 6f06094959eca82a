//! Type definitions for the vsynx data model and configuration

mod editor_types;
mod extension_types;
mod session_config;
mod sync_types;

pub use editor_types::*;
pub use extension_types::*;
pub use session_config::*;
pub use sync_types::*;
