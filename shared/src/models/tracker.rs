//! QR tracker models

use serde::{Deserialize, Serialize};

/// A distributed QR code and its scan counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrTracker {
    /// Slug used in `/qrcodes/{id}/...`
    pub id: String,
    pub name: String,
    pub total_accesses: u64,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<i64>,
}

impl QrTracker {
    /// Name given to trackers created by their first scan
    pub fn default_name(id: &str) -> String {
        format!("QR {id}")
    }
}

/// One scan of a tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub timestamp: i64,
    pub user_agent: String,
    pub language: String,
    pub outlink: String,
}

/// Admin create payload
#[derive(Debug, Clone, Deserialize)]
pub struct QrTrackerCreate {
    pub id: String,
    pub name: String,
}
