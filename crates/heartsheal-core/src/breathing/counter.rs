//! Sub-count scheduler.
//!
//! Within a phase, decides which whole second (if any) to announce on the
//! current tick. The candidate is the second being counted,
//! `floor(elapsed) + 1`, capped at the phase length; the frequency policy
//! filters which candidates are actually spoken.

use serde::{Deserialize, Serialize};

use crate::audio::AudioCue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CounterFrequency {
    #[default]
    EverySecond,
    HalfWay,
    QuarterPoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterSound {
    #[default]
    Beep,
    Tone,
    Voice,
    None,
}

impl CounterSound {
    /// Cue for announcing `count`. Voice only covers 1..=10.
    pub fn cue_for(self, count: u32) -> Option<AudioCue> {
        match self {
            CounterSound::Beep => Some(AudioCue::CounterBeep),
            CounterSound::Tone => Some(AudioCue::CounterTone),
            CounterSound::Voice if (1..=10).contains(&count) => Some(AudioCue::CounterVoice(count)),
            CounterSound::Voice | CounterSound::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CounterSettings {
    pub enabled: bool,
    pub frequency: CounterFrequency,
    pub sound: CounterSound,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CounterScheduler {
    settings: CounterSettings,
    last_count: u32,
}

impl CounterScheduler {
    pub fn new(settings: CounterSettings) -> Self {
        Self {
            settings,
            last_count: 0,
        }
    }

    /// Swap settings mid-phase without re-announcing the current count.
    pub fn with_last_count(settings: CounterSettings, last_count: u32) -> Self {
        Self {
            settings,
            last_count,
        }
    }

    pub fn settings(&self) -> CounterSettings {
        self.settings
    }

    pub fn last_count(&self) -> u32 {
        self.last_count
    }

    /// Called at every phase boundary.
    pub fn reset(&mut self) {
        self.last_count = 0;
    }

    /// Returns the count to announce on this tick, if any.
    pub fn poll(&mut self, elapsed_ms: u64, phase_ms: u64, running: bool) -> Option<u32> {
        if !self.settings.enabled || !running || phase_ms == 0 {
            return None;
        }
        let phase_secs = u32::try_from(phase_ms.div_ceil(1000)).unwrap_or(u32::MAX);
        let candidate = u32::try_from(elapsed_ms / 1000)
            .unwrap_or(u32::MAX)
            .saturating_add(1)
            .min(phase_secs);

        if candidate == self.last_count {
            return None;
        }
        if !announces(self.settings.frequency, candidate, phase_secs) {
            return None;
        }
        self.last_count = candidate;
        Some(candidate)
    }
}

fn announces(frequency: CounterFrequency, count: u32, duration: u32) -> bool {
    match frequency {
        CounterFrequency::EverySecond => true,
        CounterFrequency::HalfWay => count == duration.div_ceil(2) || count == duration,
        CounterFrequency::QuarterPoints => {
            let quarter = |n: u64| (u64::from(duration) * n).div_ceil(4);
            let count = u64::from(count);
            [quarter(1), quarter(2), quarter(3), u64::from(duration)].contains(&count)
        }
    }
}
