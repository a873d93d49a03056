use serde::{Deserialize, Serialize};

use super::pattern::{BreathingPattern, PhaseSequence};
use crate::audio::AudioCue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Inhale,
    Hold1,
    Exhale,
    Hold2,
    LeftNostril,
    RightNostril,
}

impl Phase {
    /// Transition table. Zero-length holds are skipped, never entered.
    pub fn next(self, pattern: &BreathingPattern) -> Phase {
        match (pattern.sequence, self) {
            (PhaseSequence::AlternateNostril, Phase::LeftNostril) => Phase::RightNostril,
            (PhaseSequence::AlternateNostril, _) => Phase::LeftNostril,
            (PhaseSequence::Standard, Phase::Inhale) if pattern.hold1() > 0 => Phase::Hold1,
            (PhaseSequence::Standard, Phase::Inhale | Phase::Hold1) => Phase::Exhale,
            (PhaseSequence::Standard, Phase::Exhale) if pattern.hold2() > 0 => Phase::Hold2,
            (PhaseSequence::Standard, _) => Phase::Inhale,
        }
    }

    /// Cue played when this phase is entered.
    pub fn entry_cue(self) -> AudioCue {
        match self {
            Phase::Inhale | Phase::LeftNostril | Phase::RightNostril => AudioCue::Inhale,
            Phase::Hold1 | Phase::Hold2 => AudioCue::Hold,
            Phase::Exhale => AudioCue::Exhale,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Inhale => "Breathe In",
            Phase::Hold1 | Phase::Hold2 => "Hold",
            Phase::Exhale => "Breathe Out",
            Phase::LeftNostril => "Left Nostril",
            Phase::RightNostril => "Right Nostril",
        }
    }
}
