//! Pre-session "3-2-1" countdown.

use serde::{Deserialize, Serialize};

pub const DEFAULT_COUNTDOWN_SECS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Nothing to show this tick.
    Pending,
    /// A new whole second is displayed.
    Announce(u32),
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    total_secs: u32,
    remaining_ms: u64,
    shown: u32,
}

impl Countdown {
    pub fn new(total_secs: u32) -> Self {
        Self {
            total_secs,
            remaining_ms: u64::from(total_secs) * 1000,
            shown: 0,
        }
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Number currently on screen.
    pub fn display(&self) -> u32 {
        u32::try_from(self.remaining_ms.div_ceil(1000)).unwrap_or(u32::MAX)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_ms == 0
    }

    /// First announcement, made the moment the countdown is armed.
    pub fn arm(&mut self) -> CountdownStep {
        if self.is_finished() {
            return CountdownStep::Finished;
        }
        self.shown = self.display();
        CountdownStep::Announce(self.shown)
    }

    pub fn tick(&mut self, step_ms: u64) -> CountdownStep {
        if self.is_finished() {
            return CountdownStep::Finished;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(step_ms);
        if self.is_finished() {
            return CountdownStep::Finished;
        }
        let display = self.display();
        if display != self.shown {
            self.shown = display;
            CountdownStep::Announce(display)
        } else {
            CountdownStep::Pending
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}
