//! Terminal output for live sessions.

use std::io::Write;

use heartsheal_core::storage::AudioConfig;
use heartsheal_core::{AudioCue, CueError, CuePlayer, Event};

/// Plays cues as terminal bells and short markers on stderr.
#[derive(Debug, Clone)]
pub struct TerminalPlayer {
    enabled: bool,
    bell: bool,
}

impl TerminalPlayer {
    pub fn new(audio: &AudioConfig) -> Self {
        Self {
            enabled: audio.enabled,
            bell: audio.bell,
        }
    }
}

impl CuePlayer for TerminalPlayer {
    fn play(&self, cue: AudioCue) -> Result<(), CueError> {
        if !self.enabled {
            return Ok(());
        }
        let marker = match cue {
            AudioCue::Inhale | AudioCue::Hold | AudioCue::Exhale | AudioCue::Completion => {
                if self.bell {
                    "\x07"
                } else {
                    ""
                }
            }
            AudioCue::Countdown | AudioCue::CounterBeep => "·",
            AudioCue::CounterTone => "♪",
            // spoken counts are rendered from the CounterTick event
            AudioCue::CounterVoice(_) => "",
        };
        if marker.is_empty() {
            return Ok(());
        }
        let mut err = std::io::stderr().lock();
        err.write_all(marker.as_bytes())?;
        err.flush()?;
        Ok(())
    }
}

/// Human-readable line for an event, if it deserves one.
pub fn render(event: &Event) -> Option<String> {
    match event {
        Event::CountdownStarted { pattern_id, .. } => Some(format!("Get ready: {pattern_id}")),
        Event::CountdownTick { remaining_secs, .. } => Some(format!("  {remaining_secs}...")),
        Event::SessionStarted {
            phase,
            duration_ms,
            target_cycles,
            ..
        } => Some(format!(
            "Starting {target_cycles} cycles\n{:<14} {}s",
            phase.label(),
            duration_ms / 1000
        )),
        Event::PhaseChanged {
            to, duration_ms, ..
        } => Some(format!("{:<14} {}s", to.label(), duration_ms / 1000)),
        Event::CycleCompleted {
            cycles_completed,
            target_cycles,
            ..
        } => Some(format!("-- cycle {cycles_completed}/{target_cycles} --")),
        Event::CounterTick { count, .. } => Some(format!("    {count}")),
        Event::SessionPaused { .. } => Some("Paused (p to resume)".into()),
        Event::SessionResumed { .. } => Some("Resumed".into()),
        Event::SessionReset { phase, .. } => {
            Some(format!("Reset to {} (p to start)", phase.label()))
        }
        Event::SessionExited { .. } => Some("Session ended".into()),
        Event::SessionCompleted { summary } => Some(format!(
            "Well done. {} x{} in {}",
            summary.pattern_name,
            summary.cycles,
            summary.duration_label()
        )),
        Event::StateSnapshot { .. } => None,
    }
}
