// DSM API response types
//
// Every DSM endpoint wraps its payload in the same envelope:
// `{ "success": bool, "data": {...}?, "error": { "code": N }? }`.
// Fields use `#[serde(default)]` liberally because the API is inconsistent
// about field presence across firmware versions.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard DSM API response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<EnvelopeError>,
}

/// Error object carried by the envelope on `success: false`.
#[derive(Debug, Deserialize)]
pub struct EnvelopeError {
    pub code: i64,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

// ── Application bundles ──────────────────────────────────────────────

/// Reported status of a bundle. An open set: firmware versions add values,
/// so anything unrecognized is carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BundleStatus {
    Running,
    Stopped,
    Other(String),
}

impl From<String> for BundleStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "RUNNING" => Self::Running,
            "STOPPED" => Self::Stopped,
            _ => Self::Other(s),
        }
    }
}

impl From<BundleStatus> for String {
    fn from(s: BundleStatus) -> Self {
        match s {
            BundleStatus::Running => "RUNNING".into(),
            BundleStatus::Stopped => "STOPPED".into(),
            BundleStatus::Other(s) => s,
        }
    }
}

impl std::fmt::Display for BundleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => f.write_str("RUNNING"),
            Self::Stopped => f.write_str("STOPPED"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// One containerized application bundle as reported by the list call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationBundle {
    pub id: String,
    pub name: String,
    #[serde(default = "unknown_status")]
    pub status: BundleStatus,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn unknown_status() -> BundleStatus {
    BundleStatus::Other("unknown".into())
}

/// Payload of the bundle list call.
///
/// Depending on firmware, `projects` arrives as an array of bundle objects
/// or as a map keyed by bundle id. Both normalize to an ordered Vec.
#[derive(Debug, Deserialize)]
pub struct BundleListData {
    #[serde(default)]
    pub projects: BundleCollection,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BundleCollection {
    Seq(Vec<ApplicationBundle>),
    Keyed(serde_json::Map<String, serde_json::Value>),
}

impl Default for BundleCollection {
    fn default() -> Self {
        Self::Seq(Vec::new())
    }
}

impl BundleCollection {
    /// Flatten either wire shape into an ordered sequence.
    ///
    /// Keyed entries that fail to deserialize are skipped rather than
    /// failing the whole list (the list call must never crash on one
    /// malformed record).
    pub fn into_vec(self) -> Vec<ApplicationBundle> {
        match self {
            Self::Seq(v) => v,
            Self::Keyed(map) => map
                .into_iter()
                .filter_map(|(_, v)| serde_json::from_value(v).ok())
                .collect(),
        }
    }
}
