//! # HeartsHeal Core Library
//!
//! Core logic for the HeartsHeal guided breathing exercises. Everything a
//! front-end needs lives here; the `heartsheal` CLI is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Session Controller**: a tick-driven state machine that walks a user
//!   through inhale/hold/exhale/hold (or alternate-nostril) phases. The caller
//!   invokes `tick()` on a fixed interval; audio and wall-clock time are
//!   injected capabilities.
//! - **Driver**: real-time (tokio interval) and simulated schedulers for the
//!   controller
//! - **Storage**: SQLite-based session history and TOML-based configuration
//! - **Stats**: totals, per-pattern usage and streaks over session history
//!
//! ## Key Components
//!
//! - [`SessionController`]: Core breathing state machine
//! - [`BreathingPattern`]: Immutable pattern definitions
//! - [`Database`]: Session persistence
//! - [`Config`]: Application configuration management

pub mod audio;
pub mod breathing;
pub mod clock;
pub mod driver;
pub mod error;
pub mod events;
pub mod stats;
pub mod storage;

pub use audio::{AudioCue, CueError, CuePlayer, RecordingPlayer, SilentPlayer};
pub use breathing::{
    builtin_patterns, find_pattern, BreathingPattern, CounterFrequency, CounterSettings,
    CounterSound, CustomDurations, Phase, SessionController, SessionSettings, SessionStatus,
    SessionSummary,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::{run_realtime, simulate, DriverCommand, DriverOutcome};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use stats::{BreathingStats, BreathingStatsAnalyzer, PatternUsage};
pub use storage::{Config, Database, SessionRecord};
