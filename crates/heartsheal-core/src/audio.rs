//! Audio cue capability.
//!
//! The controller only asks for a cue to be played. Whatever produces the
//! sound lives behind [`CuePlayer`]; a failing player must never stall the
//! session, so callers go through [`play_or_log`].

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cue", content = "count", rename_all = "kebab-case")]
pub enum AudioCue {
    Inhale,
    Hold,
    Exhale,
    Completion,
    /// One tick of the pre-session countdown.
    Countdown,
    CounterBeep,
    CounterTone,
    /// Spoken number, 1 through 10.
    CounterVoice(u32),
}

#[derive(Error, Debug)]
pub enum CueError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("cue {0:?} not supported by this player")]
    Unsupported(AudioCue),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait CuePlayer {
    fn play(&self, cue: AudioCue) -> Result<(), CueError>;
}

impl<P: CuePlayer + ?Sized> CuePlayer for Box<P> {
    fn play(&self, cue: AudioCue) -> Result<(), CueError> {
        (**self).play(cue)
    }
}

impl<P: CuePlayer + ?Sized> CuePlayer for &P {
    fn play(&self, cue: AudioCue) -> Result<(), CueError> {
        (**self).play(cue)
    }
}

/// Fire-and-forget playback. Failures are logged and dropped.
pub fn play_or_log<P: CuePlayer + ?Sized>(player: &P, cue: AudioCue) {
    if let Err(e) = player.play(cue) {
        tracing::warn!(?cue, error = %e, "audio cue failed");
    }
}

/// Player that makes no sound. Used when audio is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl CuePlayer for SilentPlayer {
    fn play(&self, _cue: AudioCue) -> Result<(), CueError> {
        Ok(())
    }
}

/// Remembers every cue it was asked to play.
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    cues: Mutex<Vec<AudioCue>>,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<AudioCue> {
        self.cues
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn count(&self, cue: AudioCue) -> usize {
        self.cues().iter().filter(|c| **c == cue).count()
    }

    pub fn clear(&self) {
        if let Ok(mut cues) = self.cues.lock() {
            cues.clear();
        }
    }
}

impl CuePlayer for RecordingPlayer {
    fn play(&self, cue: AudioCue) -> Result<(), CueError> {
        match self.cues.lock() {
            Ok(mut cues) => cues.push(cue),
            Err(poisoned) => poisoned.into_inner().push(cue),
        }
        Ok(())
    }
}
