//! Extension, trust and audit types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Extension identifier in `publisher.name` form
///
/// Comparison, ordering and hashing ignore ASCII case; display keeps the
/// casing the id was created with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtensionId(String);

impl ExtensionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased form used by inventory indexes
    pub fn normalized(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    pub fn publisher(&self) -> Option<&str> {
        self.0.split_once('.').map(|(publisher, _)| publisher)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, name)| name)
    }
}

impl PartialEq for ExtensionId {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for ExtensionId {}

impl Hash for ExtensionId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl Ord for ExtensionId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .bytes()
            .map(|b| b.to_ascii_lowercase())
            .cmp(other.0.bytes().map(|b| b.to_ascii_lowercase()))
    }
}

impl PartialOrd for ExtensionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExtensionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ExtensionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An extension installed in one editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionRecord {
    pub id: ExtensionId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub publisher: String,
    pub version: String,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

fn default_enabled() -> bool {
    true
}

impl ExtensionRecord {
    /// Minimal record with publisher and name derived from the id
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        let id = ExtensionId::new(id);
        Self {
            name: id.name().unwrap_or_default().to_string(),
            publisher: id.publisher().unwrap_or_default().to_string(),
            id,
            version: version.into(),
            is_enabled: true,
            path: String::new(),
            last_modified: None,
        }
    }
}

/// Backend-assigned trust classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrustLevel {
    Legitimate,
    Suspicious,
    Malicious,
    #[default]
    Unknown,
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrustLevel::Legitimate => "Legitimate",
            TrustLevel::Suspicious => "Suspicious",
            TrustLevel::Malicious => "Malicious",
            TrustLevel::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Registry a metadata snapshot came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Registry {
    #[default]
    Marketplace,
    OpenVsx,
}

/// Marketplace or registry metadata for one extension
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionMetadata {
    pub id: String,
    pub publisher: String,
    #[serde(default)]
    pub is_verified_publisher: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default)]
    pub source: Registry,
}

/// Verdict for a single extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub extension_id: String,
    pub trust_level: TrustLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace_data: Option<ExtensionMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openvsx_data: Option<ExtensionMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub differences: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn new(extension_id: impl Into<String>, trust_level: TrustLevel) -> Self {
        Self {
            extension_id: extension_id.into(),
            trust_level,
            marketplace_data: None,
            openvsx_data: None,
            differences: Vec::new(),
            recommendation: String::new(),
            error: None,
        }
    }
}

/// Result of auditing every extension of one editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub total_extensions: usize,
    pub legitimate_count: usize,
    pub suspicious_count: usize,
    pub malicious_count: usize,
    pub unknown_count: usize,
    pub results: Vec<ValidationResult>,
    pub audit_time: DateTime<Utc>,
}

impl AuditReport {
    /// Build a report, deriving the per-class counts from `results`
    pub fn from_results(results: Vec<ValidationResult>, audit_time: DateTime<Utc>) -> Self {
        let count = |level: TrustLevel| results.iter().filter(|r| r.trust_level == level).count();
        Self {
            total_extensions: results.len(),
            legitimate_count: count(TrustLevel::Legitimate),
            suspicious_count: count(TrustLevel::Suspicious),
            malicious_count: count(TrustLevel::Malicious),
            unknown_count: count(TrustLevel::Unknown),
            results,
            audit_time,
        }
    }

    pub fn count(&self, level: TrustLevel) -> usize {
        match level {
            TrustLevel::Legitimate => self.legitimate_count,
            TrustLevel::Suspicious => self.suspicious_count,
            TrustLevel::Malicious => self.malicious_count,
            TrustLevel::Unknown => self.unknown_count,
        }
    }

    /// Results that need attention, most severe first
    pub fn flagged(&self) -> Vec<&ValidationResult> {
        let mut flagged: Vec<&ValidationResult> = self
            .results
            .iter()
            .filter(|r| matches!(r.trust_level, TrustLevel::Malicious | TrustLevel::Suspicious))
            .collect();
        flagged.sort_by_key(|r| r.trust_level != TrustLevel::Malicious);
        flagged
    }
}
