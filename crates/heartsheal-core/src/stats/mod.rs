//! Statistics over completed breathing sessions.

mod practice;

pub use practice::{BreathingStats, BreathingStatsAnalyzer, PatternUsage};
