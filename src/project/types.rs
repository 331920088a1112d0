// Project metadata - the serialized shapes of the on-disk store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One uploaded sample, as recorded in `project.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleMeta {
    pub filename: String,
    pub uploaded: DateTime<Utc>,
    pub size: u64,
}

/// Everything a project persists: identity, uploaded samples, and the
/// current pattern + tempo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectData {
    pub id: String,
    pub created: DateTime<Utc>,
    pub samples: Vec<SampleMeta>,
    /// Rows indexed by instrument, columns by step.
    pub pattern: Vec<Vec<bool>>,
    pub bpm: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl ProjectData {
    pub fn new(id: String) -> Self {
        Self {
            id,
            created: Utc::now(),
            samples: Vec::new(),
            pattern: Vec::new(),
            bpm: 120,
            last_modified: None,
        }
    }
}

/// One entry of the project's change log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub data: serde_json::Value,
}

impl ChangeRecord {
    pub fn new(action: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            timestamp: Utc::now(),
            action: action.into(),
            data,
        }
    }
}

/// The `history.json` change log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    pub changes: Vec<ChangeRecord>,
}
