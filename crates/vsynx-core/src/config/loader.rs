//! Layered session configuration loader
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.vsynx/config.yaml)
//! 3. Environment variables (VSYNX_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::{EditorId, SessionConfig};
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "session-defaults.yaml";
const USER_FILE: &str = "config.yaml";

/// Session configuration loader
pub struct SessionConfigLoader {
    /// Directory holding the user config file
    config_dir: Utf8PathBuf,
}

impl SessionConfigLoader {
    /// Create a loader rooted at the standard config directory (~/.vsynx)
    pub fn new() -> Result<Self> {
        let config_dir = Self::default_config_dir()?;
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    fn default_config_dir() -> Result<Utf8PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::invalid_config("Could not determine home directory"))?;
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|p| Error::invalid_config(format!("Home directory is not UTF-8: {}", p.display())))?;
        Ok(home.join(".vsynx"))
    }

    /// Load the session configuration with layered precedence
    pub fn load(&self) -> Result<SessionConfig> {
        let mut layered = Self::load_embedded_config::<Value>(DEFAULTS_FILE)?;

        let user_path = self.config_dir.join(USER_FILE);
        if user_path.exists() {
            debug!("Loading session config from {}", user_path);
            let overlay = self.load_yaml_file::<Value>(&user_path)?;
            Self::merge(&mut layered, overlay);
        }

        let config: SessionConfig = serde_yaml_ng::from_value(layered).map_err(|e| {
            Error::invalid_config(format!("Invalid session configuration: {}", e))
        })?;
        self.apply_env_overrides(config)
    }

    fn load_embedded_config<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    fn load_yaml_file<T: DeserializeOwned>(&self, path: &Utf8Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Deep merge: mappings merge key by key, any other overlay value replaces the base
    fn merge(base: &mut Value, overlay: Value) {
        match (base, overlay) {
            (Value::Mapping(base), Value::Mapping(overlay)) => {
                for (key, value) in overlay {
                    match base.get_mut(&key) {
                        Some(existing) => Self::merge(existing, value),
                        None => {
                            base.insert(key, value);
                        }
                    }
                }
            }
            (_, Value::Null) => {}
            (base, overlay) => *base = overlay,
        }
    }

    fn apply_env_overrides(&self, mut config: SessionConfig) -> Result<SessionConfig> {
        if let Ok(val) = env::var("VSYNX_DEBOUNCE_MS") {
            config.search.debounce_ms = val
                .parse()
                .map_err(|_| Error::invalid_config("VSYNX_DEBOUNCE_MS must be a valid number"))?;
        }

        if let Ok(val) = env::var("VSYNX_MIN_QUERY_LEN") {
            config.search.min_query_len = val
                .parse()
                .map_err(|_| Error::invalid_config("VSYNX_MIN_QUERY_LEN must be a valid number"))?;
        }

        if let Ok(val) = env::var("VSYNX_SUGGESTION_LIMIT") {
            config.search.suggestion_limit = val.parse().map_err(|_| {
                Error::invalid_config("VSYNX_SUGGESTION_LIMIT must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("VSYNX_SYNC_RESET_DELAY_MS") {
            config.sync.reset_delay_ms = val.parse().map_err(|_| {
                Error::invalid_config("VSYNX_SYNC_RESET_DELAY_MS must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("VSYNX_DEFAULT_SOURCE") {
            if !val.trim().is_empty() {
                config.editors.default_source = EditorId::from(val.trim());
            }
        }

        Ok(config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}
