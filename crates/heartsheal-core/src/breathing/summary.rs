use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record handed to the completion view once the cycle target is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub pattern_id: String,
    pub pattern_name: String,
    /// Cycle target that was completed.
    pub cycles: u32,
    /// Wall-clock time from session start to completion.
    pub duration_ms: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn duration_secs(&self) -> u64 {
        self.duration_ms / 1000
    }

    /// "m:ss" for display.
    pub fn duration_label(&self) -> String {
        let secs = self.duration_secs();
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}
