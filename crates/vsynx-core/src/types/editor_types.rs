//! Editor profile, status and CLI availability types

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Well-known editor ids
pub mod editor_ids {
    pub const VSCODE: &str = "vscode";
    pub const VSCODE_INSIDERS: &str = "vscode-insiders";
    pub const VSCODIUM: &str = "vscodium";
    pub const WINDSURF: &str = "windsurf";
    pub const CURSOR: &str = "cursor";
    pub const KIRO: &str = "kiro";
}

/// Unique key of an editor profile (e.g. "vscode", "windsurf")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorId(String);

impl EditorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EditorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EditorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for EditorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EditorId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Whether an editor is a VS Code build or a VS Code clone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditorFamily {
    /// VS Code, Insiders, VSCodium: ships a `code`-style CLI
    VsCode,
    /// Windsurf, Cursor, Kiro and other forks
    Clone,
}

/// Immutable descriptor of a known editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorProfile {
    pub id: EditorId,
    pub name: String,
    pub extensions_dir: String,
    #[serde(default = "default_index_file")]
    pub index_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cli_command: Option<String>,
    pub family: EditorFamily,
    #[serde(default)]
    pub is_custom: bool,
}

fn default_index_file() -> String {
    "extensions.json".to_string()
}

impl EditorProfile {
    pub fn is_vscode_family(&self) -> bool {
        self.family == EditorFamily::VsCode
    }
}

/// Live availability of an editor, recomputed on directory reload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorStatus {
    pub editor: EditorProfile,
    pub is_available: bool,
    #[serde(default)]
    pub extension_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_reason: Option<String>,
    #[serde(default)]
    pub cli_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cli_path: Option<String>,
}

impl EditorStatus {
    /// Status for an editor whose extensions directory is missing
    pub fn unavailable(editor: EditorProfile, reason: impl Into<String>) -> Self {
        Self {
            editor,
            is_available: false,
            extension_count: 0,
            disabled_reason: Some(reason.into()),
            cli_available: false,
            cli_path: None,
        }
    }
}

/// Supported `code`-style command line flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CliFlavor {
    Code,
    CodeInsiders,
    Codium,
}

impl CliFlavor {
    /// Flavors in install-target preference order
    pub const ALL: [CliFlavor; 3] = [CliFlavor::Code, CliFlavor::CodeInsiders, CliFlavor::Codium];

    /// Executable name
    pub fn command(self) -> &'static str {
        match self {
            CliFlavor::Code => "code",
            CliFlavor::CodeInsiders => "code-insiders",
            CliFlavor::Codium => "codium",
        }
    }

    /// Editor the CLI installs into
    pub fn editor_id(self) -> EditorId {
        let id = match self {
            CliFlavor::Code => editor_ids::VSCODE,
            CliFlavor::CodeInsiders => editor_ids::VSCODE_INSIDERS,
            CliFlavor::Codium => editor_ids::VSCODIUM,
        };
        EditorId::from(id)
    }

    /// CLI flavor for an editor, if it has one
    pub fn for_editor(editor: &EditorId) -> Option<Self> {
        match editor.as_str() {
            editor_ids::VSCODE => Some(CliFlavor::Code),
            editor_ids::VSCODE_INSIDERS => Some(CliFlavor::CodeInsiders),
            editor_ids::VSCODIUM => Some(CliFlavor::Codium),
            _ => None,
        }
    }
}

impl fmt::Display for CliFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Availability of each CLI flavor, keyed by flavor with the resolved executable path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliStatus {
    #[serde(default)]
    pub tools: BTreeMap<CliFlavor, String>,
}

impl CliStatus {
    /// Record a flavor as available at `path`
    pub fn with_tool(mut self, flavor: CliFlavor, path: impl Into<String>) -> Self {
        self.tools.insert(flavor, path.into());
        self
    }

    pub fn is_available(&self, flavor: CliFlavor) -> bool {
        self.tools.contains_key(&flavor)
    }

    pub fn path(&self, flavor: CliFlavor) -> Option<&str> {
        self.tools.get(&flavor).map(String::as_str)
    }

    pub fn any_available(&self) -> bool {
        !self.tools.is_empty()
    }

    /// First available flavor in preference order
    pub fn preferred(&self) -> Option<CliFlavor> {
        CliFlavor::ALL.into_iter().find(|f| self.is_available(*f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_preferred_follows_flavor_order() {
        let status = CliStatus::default()
            .with_tool(CliFlavor::Codium, "/usr/bin/codium")
            .with_tool(CliFlavor::CodeInsiders, "/usr/bin/code-insiders");
        assert_eq!(status.preferred(), Some(CliFlavor::CodeInsiders));
        assert!(status.any_available());
        assert!(!status.is_available(CliFlavor::Code));
    }

    #[test]
    fn test_cli_none_available() {
        let status = CliStatus::default();
        assert!(!status.any_available());
        assert_eq!(status.preferred(), None);
    }

    #[test]
    fn test_flavor_editor_mapping() {
        for flavor in CliFlavor::ALL {
            assert_eq!(CliFlavor::for_editor(&flavor.editor_id()), Some(flavor));
        }
        assert_eq!(CliFlavor::for_editor(&EditorId::from("windsurf")), None);
    }

    #[test]
    fn test_profile_deserializes_camel_case() {
        let yaml = r#"
id: cursor
name: Cursor
extensionsDir: /home/dev/.cursor/extensions
family: clone
"#;
        let profile: EditorProfile = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(profile.id.as_str(), "cursor");
        assert_eq!(profile.index_file, "extensions.json");
        assert!(profile.cli_command.is_none());
        assert!(!profile.is_vscode_family());
    }
}
