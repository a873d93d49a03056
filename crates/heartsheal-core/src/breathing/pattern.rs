//! Breathing pattern catalog.
//!
//! Patterns are immutable value objects. A session never mutates a catalog
//! entry; it works on a [`BreathingPattern::snapshot`] taken at start, which
//! is where the user's slider values for the `custom` pattern are applied.

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::error::ValidationError;

/// Id of the synthetic pattern whose durations come from user sliders.
pub const CUSTOM_PATTERN_ID: &str = "custom";

/// Longest allowed phase, in seconds.
pub const MAX_PHASE_SECS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    Beginner,
    Intermediate,
    Advanced,
}

/// Hint for the visualiser. The engine ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationHint {
    Circle,
    Square,
    Triangle,
    Wave,
    Nostril,
}

/// How a pattern walks through its phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseSequence {
    /// inhale, hold1, exhale, hold2 (holds optional)
    Standard,
    /// leftNostril, rightNostril; each lasts the inhale duration
    AlternateNostril,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingPattern {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: PatternCategory,
    pub animation: AnimationHint,
    pub sequence: PhaseSequence,
    /// Inhale duration in seconds.
    pub inhale_secs: u32,
    /// Hold after inhale, in seconds. `None` or zero skips the phase.
    #[serde(default)]
    pub hold1_secs: Option<u32>,
    /// Exhale duration in seconds.
    pub exhale_secs: u32,
    /// Hold after exhale, in seconds. `None` or zero skips the phase.
    #[serde(default)]
    pub hold2_secs: Option<u32>,
    pub recommended_cycles: u32,
}

/// Slider values for the `custom` pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomDurations {
    pub inhale: u32,
    pub hold1: u32,
    pub exhale: u32,
    pub hold2: u32,
}

impl Default for CustomDurations {
    fn default() -> Self {
        Self {
            inhale: 4,
            hold1: 4,
            exhale: 4,
            hold2: 4,
        }
    }
}

impl BreathingPattern {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.inhale_secs == 0 {
            return Err(ValidationError::InvalidDuration { phase: "inhale" });
        }
        if self.exhale_secs == 0 && self.sequence == PhaseSequence::Standard {
            return Err(ValidationError::InvalidDuration { phase: "exhale" });
        }
        let phases = [
            ("inhale", self.inhale_secs),
            ("hold1", self.hold1()),
            ("exhale", self.exhale_secs),
            ("hold2", self.hold2()),
        ];
        for (phase, secs) in phases {
            if secs > MAX_PHASE_SECS {
                return Err(ValidationError::InvalidValue {
                    field: phase.to_string(),
                    message: format!("{secs}s exceeds the {MAX_PHASE_SECS}s phase limit"),
                });
            }
        }
        Ok(())
    }

    pub fn is_custom(&self) -> bool {
        self.id == CUSTOM_PATTERN_ID
    }

    /// Effective hold-after-inhale; zero when absent.
    pub fn hold1(&self) -> u32 {
        self.hold1_secs.unwrap_or(0)
    }

    /// Effective hold-after-exhale; zero when absent.
    pub fn hold2(&self) -> u32 {
        self.hold2_secs.unwrap_or(0)
    }

    /// Phase a session of this pattern begins in.
    pub fn initial_phase(&self) -> Phase {
        match self.sequence {
            PhaseSequence::Standard => Phase::Inhale,
            PhaseSequence::AlternateNostril => Phase::LeftNostril,
        }
    }

    /// The phase whose exit closes a cycle.
    pub fn cycle_closing_phase(&self) -> Phase {
        match self.sequence {
            PhaseSequence::AlternateNostril => Phase::RightNostril,
            PhaseSequence::Standard if self.hold2() > 0 => Phase::Hold2,
            PhaseSequence::Standard => Phase::Exhale,
        }
    }

    /// Full duration of `phase` in seconds for this pattern.
    pub fn phase_secs(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale | Phase::LeftNostril | Phase::RightNostril => self.inhale_secs,
            Phase::Hold1 => self.hold1(),
            Phase::Exhale => self.exhale_secs,
            Phase::Hold2 => self.hold2(),
        }
    }

    /// Full duration of `phase` in milliseconds.
    pub fn phase_ms(&self, phase: Phase) -> u64 {
        u64::from(self.phase_secs(phase)).saturating_mul(1000)
    }

    /// Length of one full cycle in seconds.
    pub fn cycle_secs(&self) -> u32 {
        match self.sequence {
            PhaseSequence::Standard => self
                .inhale_secs
                .saturating_add(self.hold1())
                .saturating_add(self.exhale_secs)
                .saturating_add(self.hold2()),
            PhaseSequence::AlternateNostril => self.inhale_secs.saturating_mul(2),
        }
    }

    /// Derive the pattern a session runs with.
    ///
    /// Overrides only apply to the `custom` pattern; zero holds become `None`.
    pub fn snapshot(&self, custom: Option<&CustomDurations>) -> BreathingPattern {
        let mut pattern = self.clone();
        if let (true, Some(c)) = (self.is_custom(), custom) {
            pattern.inhale_secs = c.inhale;
            pattern.hold1_secs = Some(c.hold1).filter(|s| *s > 0);
            pattern.exhale_secs = c.exhale;
            pattern.hold2_secs = Some(c.hold2).filter(|s| *s > 0);
        }
        pattern
    }

    /// Compact "4-7-8" style label of the durations.
    pub fn rhythm_label(&self) -> String {
        match self.sequence {
            PhaseSequence::AlternateNostril => format!("{}-{}", self.inhale_secs, self.inhale_secs),
            PhaseSequence::Standard => {
                let mut parts = vec![self.inhale_secs.to_string()];
                if self.hold1() > 0 {
                    parts.push(self.hold1().to_string());
                }
                parts.push(self.exhale_secs.to_string());
                if self.hold2() > 0 {
                    parts.push(self.hold2().to_string());
                }
                parts.join("-")
            }
        }
    }
}

fn pattern(
    id: &str,
    name: &str,
    description: &str,
    category: PatternCategory,
    animation: AnimationHint,
    durations: (u32, Option<u32>, u32, Option<u32>),
    recommended_cycles: u32,
) -> BreathingPattern {
    let (inhale_secs, hold1_secs, exhale_secs, hold2_secs) = durations;
    BreathingPattern {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        category,
        animation,
        sequence: PhaseSequence::Standard,
        inhale_secs,
        hold1_secs,
        exhale_secs,
        hold2_secs,
        recommended_cycles,
    }
}

/// Built-in patterns in display order.
pub fn builtin_patterns() -> Vec<BreathingPattern> {
    use AnimationHint::*;
    use PatternCategory::*;

    let mut alternate = pattern(
        "alternate-nostril",
        "Alternate Nostril",
        "Nadi shodhana: breathe through one nostril at a time to balance the mind.",
        Intermediate,
        Nostril,
        (4, None, 4, None),
        5,
    );
    alternate.sequence = PhaseSequence::AlternateNostril;

    vec![
        pattern(
            "box",
            "Box Breathing",
            "Equal inhale, hold, exhale and hold to steady focus under stress.",
            Beginner,
            Square,
            (4, Some(4), 4, Some(4)),
            4,
        ),
        pattern(
            "4-7-8",
            "4-7-8 Relaxing Breath",
            "A long hold and longer exhale that quiets the nervous system before sleep.",
            Intermediate,
            Circle,
            (4, Some(7), 8, None),
            4,
        ),
        alternate,
        pattern(
            "coherent",
            "Coherent Breathing",
            "Five seconds in, five seconds out, for heart rate variability.",
            Beginner,
            Wave,
            (5, None, 5, None),
            6,
        ),
        pattern(
            "relaxing",
            "Extended Exhale",
            "A longer exhale than inhale to ease anxiety.",
            Beginner,
            Wave,
            (4, None, 6, None),
            6,
        ),
        pattern(
            "triangle",
            "Triangle Breathing",
            "Inhale, hold and exhale in equal parts.",
            Intermediate,
            Triangle,
            (4, Some(4), 4, None),
            5,
        ),
        pattern(
            "energizing",
            "Energizing Breath",
            "Short, brisk breaths to lift energy.",
            Advanced,
            Circle,
            (2, None, 2, None),
            10,
        ),
        pattern(
            CUSTOM_PATTERN_ID,
            "Custom",
            "Set your own rhythm with the duration sliders.",
            Advanced,
            Circle,
            (4, Some(4), 4, Some(4)),
            4,
        ),
    ]
}

/// Look up a built-in pattern by id.
pub fn find_pattern(id: &str) -> Result<BreathingPattern, ValidationError> {
    builtin_patterns()
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ValidationError::UnknownPattern(id.to_string()))
}
