use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::breathing::{Phase, SessionStatus, SessionSummary};

/// Every state change of the breathing controller produces an Event.
/// Front-ends render from these; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CountdownStarted {
        pattern_id: String,
        seconds: u32,
        at: DateTime<Utc>,
    },
    CountdownTick {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    SessionStarted {
        session_id: Uuid,
        pattern_id: String,
        phase: Phase,
        duration_ms: u64,
        target_cycles: u32,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
        duration_ms: u64,
        cycles_completed: u32,
        at: DateTime<Utc>,
    },
    CycleCompleted {
        cycles_completed: u32,
        target_cycles: u32,
        at: DateTime<Utc>,
    },
    CounterTick {
        phase: Phase,
        count: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    SessionReset {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    SessionExited {
        at: DateTime<Utc>,
    },
    SessionCompleted {
        summary: SessionSummary,
    },
    StateSnapshot {
        status: SessionStatus,
        pattern_id: Option<String>,
        phase: Option<Phase>,
        phase_label: String,
        remaining_ms: u64,
        phase_ms: u64,
        cycles_completed: u32,
        target_cycles: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::SessionCompleted { .. })
    }
}
