mod countdown;
mod counter;
mod engine;
mod pattern;
mod phase;
mod summary;

pub use countdown::{Countdown, CountdownStep, DEFAULT_COUNTDOWN_SECS};
pub use counter::{CounterFrequency, CounterScheduler, CounterSettings, CounterSound};
pub use engine::{
    SessionController, SessionSettings, SessionState, SessionStatus, DEFAULT_TICK_MS, MAX_CYCLES,
    MAX_TICK_MS, MIN_CYCLES,
};
pub use pattern::{
    builtin_patterns, find_pattern, AnimationHint, BreathingPattern, CustomDurations,
    PatternCategory, PhaseSequence, CUSTOM_PATTERN_ID, MAX_PHASE_SECS,
};
pub use phase::Phase;
pub use summary::SessionSummary;
