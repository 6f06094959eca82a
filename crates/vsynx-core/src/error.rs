//! Error types for vsynx-core

use thiserror::Error;

/// Result type alias using vsynx-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for vsynx
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any backend request was issued
    #[error("{message}")]
    Validation { message: String },

    /// A backend call was rejected
    #[error("Failed to {operation}: {message}")]
    Backend { operation: String, message: String },

    /// Operation is not allowed in the controller's current state
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// Editor id not present in the directory
    #[error("Unknown editor: {editor}")]
    UnknownEditor { editor: String },

    /// CLI installation failed (first phase of install+sync)
    #[error("{message}")]
    Install { message: String },

    /// Sync after a successful CLI install failed; the installation stays in place
    #[error("Installed {extension}, but syncing to targets failed: {message}")]
    PostInstallSync { extension: String, message: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a backend error for the named operation
    pub fn backend(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create an unknown editor error
    pub fn unknown_editor(editor: impl Into<String>) -> Self {
        Self::UnknownEditor {
            editor: editor.into(),
        }
    }

    /// Create an install error carrying the CLI's message verbatim
    pub fn install(message: impl Into<String>) -> Self {
        Self::Install {
            message: message.into(),
        }
    }

    /// Create a post-install sync error
    pub fn post_install_sync(extension: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PostInstallSync {
            extension: extension.into(),
            message: message.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// True for errors caught before reaching the backend
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
