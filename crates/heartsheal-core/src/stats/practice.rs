//! Practice statistics
//!
//! Aggregates completed sessions into totals, a per-pattern breakdown and
//! daily streaks. Days are calendar days in UTC.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::storage::SessionRecord;

/// Usage of a single pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternUsage {
    pub pattern_id: String,
    pub pattern_name: String,
    pub sessions: u64,
    pub cycles: u64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreathingStats {
    pub total_sessions: u64,
    pub total_cycles: u64,
    pub total_duration_ms: u64,
    /// Total practice time in whole minutes
    pub total_minutes: u64,
    pub today_sessions: u64,
    pub today_duration_ms: u64,
    /// Most used first
    pub by_pattern: Vec<PatternUsage>,
    /// Consecutive days ending today (or yesterday, if nothing yet today)
    pub current_streak_days: u32,
    pub longest_streak_days: u32,
    /// Mean session length in seconds (0 when there are no sessions)
    pub avg_session_secs: f64,
}

#[derive(Debug, Clone, Default)]
pub struct BreathingStatsAnalyzer;

impl BreathingStatsAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, records: &[SessionRecord], today: NaiveDate) -> BreathingStats {
        let mut stats = BreathingStats::default();
        let mut usage: HashMap<&str, PatternUsage> = HashMap::new();
        let mut days = BTreeSet::new();

        for record in records {
            stats.total_sessions += 1;
            stats.total_cycles += u64::from(record.cycles);
            stats.total_duration_ms += record.duration_ms;

            let day = record.completed_at.date_naive();
            days.insert(day);
            if day == today {
                stats.today_sessions += 1;
                stats.today_duration_ms += record.duration_ms;
            }

            let entry = usage
                .entry(record.pattern_id.as_str())
                .or_insert_with(|| PatternUsage {
                    pattern_id: record.pattern_id.clone(),
                    pattern_name: record.pattern_name.clone(),
                    sessions: 0,
                    cycles: 0,
                    duration_ms: 0,
                });
            entry.sessions += 1;
            entry.cycles += u64::from(record.cycles);
            entry.duration_ms += record.duration_ms;
        }

        stats.total_minutes = stats.total_duration_ms / 60_000;
        if stats.total_sessions > 0 {
            stats.avg_session_secs =
                stats.total_duration_ms as f64 / 1000.0 / stats.total_sessions as f64;
        }

        let mut by_pattern: Vec<_> = usage.into_values().collect();
        by_pattern.sort_by(|a, b| {
            b.sessions
                .cmp(&a.sessions)
                .then_with(|| a.pattern_id.cmp(&b.pattern_id))
        });
        stats.by_pattern = by_pattern;

        stats.current_streak_days = current_streak(&days, today);
        stats.longest_streak_days = longest_streak(&days);
        stats
    }
}

fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut cursor = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };
    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

fn longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for day in days {
        run = match prev {
            Some(p) if *day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(*day);
    }
    longest
}
