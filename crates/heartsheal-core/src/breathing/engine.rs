//! Breathing session controller.
//!
//! A tick-driven state machine. It owns no thread and no timer: the caller
//! (see [`crate::driver`]) invokes `tick()` on a fixed interval, and each tick
//! takes a fixed step off the current phase's remaining time.
//!
//! ## Stages
//!
//! ```text
//! Idle -> CountingDown -> Active(running | paused) -> Active(finished)
//!   ^                                                      |
//!   +------------------------- exit() ---------------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = SessionController::new(settings, SilentPlayer, SystemClock);
//! controller.select_pattern(&find_pattern("box")?, None)?;
//! // Every 100ms:
//! for event in controller.tick() { render(event) }
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::countdown::{Countdown, CountdownStep, DEFAULT_COUNTDOWN_SECS};
use super::counter::{CounterScheduler, CounterSettings};
use super::pattern::{BreathingPattern, CustomDurations};
use super::phase::Phase;
use super::summary::SessionSummary;
use crate::audio::{play_or_log, AudioCue, CuePlayer};
use crate::clock::Clock;
use crate::error::ValidationError;
use crate::events::Event;

pub const MIN_CYCLES: u32 = 1;
pub const MAX_CYCLES: u32 = 10;
pub const DEFAULT_TICK_MS: u64 = 100;
pub const MAX_TICK_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    CountingDown,
    Running,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub target_cycles: u32,
    /// Pre-roll length; zero starts the session immediately.
    pub countdown_secs: u32,
    /// Time taken off the phase clock per tick.
    pub tick_ms: u64,
    pub counter: CounterSettings,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            target_cycles: 3,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            tick_ms: DEFAULT_TICK_MS,
            counter: CounterSettings::default(),
        }
    }
}

impl SessionSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_CYCLES..=MAX_CYCLES).contains(&self.target_cycles) {
            return Err(ValidationError::CyclesOutOfRange {
                value: self.target_cycles,
                min: MIN_CYCLES,
                max: MAX_CYCLES,
            });
        }
        if !(1..=MAX_TICK_MS).contains(&self.tick_ms) {
            return Err(ValidationError::InvalidValue {
                field: "tick_ms".into(),
                message: format!("must be between 1 and {MAX_TICK_MS}"),
            });
        }
        Ok(())
    }
}

/// Mutable state of one breathing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: Uuid,
    pub pattern: BreathingPattern,
    pub phase: Phase,
    pub remaining_ms: u64,
    pub cycles_completed: u32,
    pub running: bool,
    pub counter: CounterScheduler,
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// Set once the cycle target is reached; the state is frozen afterwards.
    pub summary: Option<SessionSummary>,
    /// True after a manual reset until the next resume restarts the run.
    #[serde(default)]
    pub rewound: bool,
}

#[derive(Debug, Clone)]
enum Stage {
    Idle,
    CountingDown {
        pattern: BreathingPattern,
        custom: Option<CustomDurations>,
        countdown: Countdown,
        paused: bool,
    },
    Active(Box<SessionState>),
}

pub struct SessionController<P: CuePlayer, C: Clock> {
    settings: SessionSettings,
    player: P,
    clock: C,
    stage: Stage,
}

impl<P: CuePlayer, C: Clock> SessionController<P, C> {
    pub fn new(settings: SessionSettings, player: P, clock: C) -> Self {
        Self {
            settings,
            player,
            clock,
            stage: Stage::Idle,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn status(&self) -> SessionStatus {
        match &self.stage {
            Stage::Idle => SessionStatus::Idle,
            Stage::CountingDown { .. } => SessionStatus::CountingDown,
            Stage::Active(s) if s.summary.is_some() => SessionStatus::Completed,
            Stage::Active(s) if s.running => SessionStatus::Running,
            Stage::Active(_) => SessionStatus::Paused,
        }
    }

    pub fn state(&self) -> Option<&SessionState> {
        match &self.stage {
            Stage::Active(s) => Some(s),
            _ => None,
        }
    }

    pub fn pattern(&self) -> Option<&BreathingPattern> {
        match &self.stage {
            Stage::Idle => None,
            Stage::CountingDown { pattern, .. } => Some(pattern),
            Stage::Active(s) => Some(&s.pattern),
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        self.state().map(|s| s.phase)
    }

    pub fn remaining_ms(&self) -> u64 {
        self.state().map(|s| s.remaining_ms).unwrap_or(0)
    }

    pub fn cycles_completed(&self) -> u32 {
        self.state().map(|s| s.cycles_completed).unwrap_or(0)
    }

    pub fn is_running(&self) -> bool {
        self.status() == SessionStatus::Running
    }

    /// Whether the scheduler should keep delivering ticks.
    pub fn is_ticking(&self) -> bool {
        match &self.stage {
            Stage::Idle => false,
            Stage::CountingDown { paused, .. } => !*paused,
            Stage::Active(s) => s.running && s.summary.is_none(),
        }
    }

    pub fn countdown_display(&self) -> Option<u32> {
        match &self.stage {
            Stage::CountingDown { countdown, .. } => Some(countdown.display()),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.state().and_then(|s| s.summary.as_ref())
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        let Some(state) = self.state() else {
            return 0.0;
        };
        let total = state.pattern.phase_ms(state.phase);
        if total == 0 {
            return 0.0;
        }
        1.0 - (state.remaining_ms as f64 / total as f64)
    }

    pub fn snapshot(&self) -> Event {
        let state = self.state();
        Event::StateSnapshot {
            status: self.status(),
            pattern_id: self.pattern().map(|p| p.id.clone()),
            phase: state.map(|s| s.phase),
            phase_label: state
                .map(|s| s.phase.label().to_string())
                .unwrap_or_default(),
            remaining_ms: state.map(|s| s.remaining_ms).unwrap_or(0),
            phase_ms: state.map(|s| s.pattern.phase_ms(s.phase)).unwrap_or(0),
            cycles_completed: state.map(|s| s.cycles_completed).unwrap_or(0),
            target_cycles: self.settings.target_cycles,
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Choose a pattern. Arms the countdown, or starts straight away when the
    /// countdown is disabled. Replaces any session in progress.
    pub fn select_pattern(
        &mut self,
        pattern: &BreathingPattern,
        custom: Option<&CustomDurations>,
    ) -> Result<Vec<Event>, ValidationError> {
        self.settings.validate()?;
        pattern.snapshot(custom).validate()?;

        let mut countdown = Countdown::new(self.settings.countdown_secs);
        let mut events = Vec::new();
        match countdown.arm() {
            CountdownStep::Announce(n) => {
                events.push(Event::CountdownStarted {
                    pattern_id: pattern.id.clone(),
                    seconds: countdown.total_secs(),
                    at: self.clock.now(),
                });
                play_or_log(&self.player, AudioCue::Countdown);
                events.push(Event::CountdownTick {
                    remaining_secs: n,
                    at: self.clock.now(),
                });
                self.stage = Stage::CountingDown {
                    pattern: pattern.clone(),
                    custom: custom.copied(),
                    countdown,
                    paused: false,
                };
            }
            CountdownStep::Pending | CountdownStep::Finished => {
                events.push(self.begin(pattern, custom));
            }
        }
        Ok(events)
    }

    /// Advance by one tick. No-op while idle, paused or finished.
    pub fn tick(&mut self) -> Vec<Event> {
        let step_ms = self.settings.tick_ms;
        match &mut self.stage {
            Stage::Idle => Vec::new(),
            Stage::CountingDown {
                pattern,
                custom,
                countdown,
                paused,
            } => {
                if *paused {
                    return Vec::new();
                }
                match countdown.tick(step_ms) {
                    CountdownStep::Pending => Vec::new(),
                    CountdownStep::Announce(n) => {
                        play_or_log(&self.player, AudioCue::Countdown);
                        vec![Event::CountdownTick {
                            remaining_secs: n,
                            at: self.clock.now(),
                        }]
                    }
                    CountdownStep::Finished => {
                        let pattern = pattern.clone();
                        let custom = *custom;
                        vec![self.begin(&pattern, custom.as_ref())]
                    }
                }
            }
            Stage::Active(state) => {
                if !state.running || state.summary.is_some() {
                    return Vec::new();
                }
                advance(
                    state,
                    step_ms,
                    self.settings.target_cycles,
                    &self.player,
                    &self.clock,
                )
            }
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        let at = self.clock.now();
        match &mut self.stage {
            Stage::CountingDown {
                countdown, paused, ..
            } if !*paused => {
                *paused = true;
                Some(Event::SessionPaused {
                    remaining_ms: countdown.remaining_ms(),
                    at,
                })
            }
            Stage::Active(state) if state.running => {
                state.running = false;
                Some(Event::SessionPaused {
                    remaining_ms: state.remaining_ms,
                    at,
                })
            }
            _ => None,
        }
    }

    /// Resume a paused session. A session rewound by `reset()` restarts
    /// here with a fresh id and start time. Finished sessions stay put.
    pub fn resume(&mut self) -> Option<Event> {
        let at = self.clock.now();
        match &mut self.stage {
            Stage::CountingDown {
                countdown, paused, ..
            } if *paused => {
                *paused = false;
                Some(Event::SessionResumed {
                    remaining_ms: countdown.remaining_ms(),
                    at,
                })
            }
            Stage::Active(state) if !state.running && state.summary.is_none() => {
                if state.rewound {
                    state.rewound = false;
                    state.session_id = Uuid::new_v4();
                    state.started_at = at;
                    play_or_log(&self.player, state.phase.entry_cue());
                }
                state.running = true;
                Some(Event::SessionResumed {
                    remaining_ms: state.remaining_ms,
                    at,
                })
            }
            _ => None,
        }
    }

    pub fn toggle(&mut self) -> Option<Event> {
        match self.status() {
            SessionStatus::Running => self.pause(),
            SessionStatus::Paused => self.resume(),
            SessionStatus::CountingDown => self.pause().or_else(|| self.resume()),
            SessionStatus::Idle | SessionStatus::Completed => None,
        }
    }

    /// Back to the pattern's first phase with zero cycles, not running.
    /// The chosen pattern is kept. During the countdown this rewinds the
    /// countdown and holds it until `resume()`.
    pub fn reset(&mut self) -> Option<Event> {
        let at = self.clock.now();
        match &mut self.stage {
            Stage::Idle => None,
            Stage::CountingDown {
                pattern,
                countdown,
                paused,
                ..
            } => {
                *countdown = Countdown::new(self.settings.countdown_secs);
                countdown.arm();
                *paused = true;
                let phase = pattern.initial_phase();
                Some(Event::SessionReset {
                    phase,
                    remaining_ms: pattern.phase_ms(phase),
                    at,
                })
            }
            Stage::Active(state) => {
                state.phase = state.pattern.initial_phase();
                state.remaining_ms = state.pattern.phase_ms(state.phase);
                state.cycles_completed = 0;
                state.running = false;
                state.counter.reset();
                state.summary = None;
                state.rewound = true;
                tracing::debug!(pattern = %state.pattern.id, "session reset");
                Some(Event::SessionReset {
                    phase: state.phase,
                    remaining_ms: state.remaining_ms,
                    at,
                })
            }
        }
    }

    /// Discard the session and return to pattern selection.
    pub fn exit(&mut self) -> Option<Event> {
        if matches!(self.stage, Stage::Idle) {
            return None;
        }
        self.stage = Stage::Idle;
        Some(Event::SessionExited {
            at: self.clock.now(),
        })
    }

    /// Change counter behaviour; takes effect on the next tick.
    pub fn set_counter(&mut self, counter: CounterSettings) {
        self.settings.counter = counter;
        if let Stage::Active(state) = &mut self.stage {
            state.counter = CounterScheduler::with_last_count(counter, state.counter.last_count());
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Countdown finished: snapshot the pattern and install the first phase.
    fn begin(&mut self, pattern: &BreathingPattern, custom: Option<&CustomDurations>) -> Event {
        let pattern = pattern.snapshot(custom);
        let phase = pattern.initial_phase();
        let remaining_ms = pattern.phase_ms(phase);
        let at = self.clock.now();
        let session_id = Uuid::new_v4();

        tracing::info!(
            pattern = %pattern.id,
            cycles = self.settings.target_cycles,
            "breathing session started"
        );
        play_or_log(&self.player, phase.entry_cue());

        let event = Event::SessionStarted {
            session_id,
            pattern_id: pattern.id.clone(),
            phase,
            duration_ms: remaining_ms,
            target_cycles: self.settings.target_cycles,
            at,
        };
        self.stage = Stage::Active(Box::new(SessionState {
            session_id,
            pattern,
            phase,
            remaining_ms,
            cycles_completed: 0,
            running: true,
            counter: CounterScheduler::new(self.settings.counter),
            started_at: at,
            summary: None,
            rewound: false,
        }));
        event
    }
}

/// One running tick of an active session.
fn advance<P: CuePlayer, C: Clock>(
    state: &mut SessionState,
    step_ms: u64,
    target_cycles: u32,
    player: &P,
    clock: &C,
) -> Vec<Event> {
    let mut events = Vec::new();
    state.remaining_ms = state.remaining_ms.saturating_sub(step_ms);

    if state.remaining_ms > 0 {
        let phase_ms = state.pattern.phase_ms(state.phase);
        let elapsed_ms = phase_ms.saturating_sub(state.remaining_ms);
        if let Some(count) = state.counter.poll(elapsed_ms, phase_ms, state.running) {
            if let Some(cue) = state.counter.settings().sound.cue_for(count) {
                play_or_log(player, cue);
            }
            events.push(Event::CounterTick {
                phase: state.phase,
                count,
                at: clock.now(),
            });
        }
        return events;
    }

    state.counter.reset();
    let exited = state.phase;
    let next = exited.next(&state.pattern);

    if exited == state.pattern.cycle_closing_phase() {
        state.cycles_completed += 1;
        events.push(Event::CycleCompleted {
            cycles_completed: state.cycles_completed,
            target_cycles,
            at: clock.now(),
        });

        if state.cycles_completed >= target_cycles {
            let completed_at = clock.now();
            let duration_ms = (completed_at - state.started_at)
                .num_milliseconds()
                .max(0) as u64;
            state.running = false;
            state.cycles_completed = 0;

            let summary = SessionSummary {
                session_id: state.session_id,
                pattern_id: state.pattern.id.clone(),
                pattern_name: state.pattern.name.clone(),
                cycles: target_cycles,
                duration_ms,
                started_at: state.started_at,
                completed_at,
            };
            tracing::info!(
                pattern = %summary.pattern_id,
                cycles = summary.cycles,
                duration_ms,
                "breathing session complete"
            );
            play_or_log(player, AudioCue::Completion);
            state.summary = Some(summary.clone());
            events.push(Event::SessionCompleted { summary });
            return events;
        }
    }

    let duration_ms = state.pattern.phase_ms(next);
    tracing::debug!(from = ?exited, to = ?next, duration_ms, "phase transition");
    play_or_log(player, next.entry_cue());
    state.phase = next;
    state.remaining_ms = duration_ms;
    events.push(Event::PhaseChanged {
        from: exited,
        to: next,
        duration_ms,
        cycles_completed: state.cycles_completed,
        at: clock.now(),
    });
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingPlayer;
    use crate::breathing::counter::{CounterFrequency, CounterSound};
    use crate::breathing::pattern::{find_pattern, CUSTOM_PATTERN_ID};
    use crate::clock::ManualClock;

    type TestController = SessionController<RecordingPlayer, ManualClock>;

    fn controller(cycles: u32, countdown_secs: u32) -> TestController {
        SessionController::new(
            SessionSettings {
                target_cycles: cycles,
                countdown_secs,
                ..SessionSettings::default()
            },
            RecordingPlayer::new(),
            ManualClock::default(),
        )
    }

    fn tick(c: &mut TestController) -> Vec<Event> {
        c.clock().advance_ms(c.settings().tick_ms);
        c.tick()
    }

    #[test]
    fn idle_controller_does_nothing() {
        let mut c = controller(3, 0);
        assert!(c.tick().is_empty());
        assert!(c.pause().is_none());
        assert!(c.resume().is_none());
        assert!(c.reset().is_none());
        assert!(c.exit().is_none());
        assert_eq!(c.status(), SessionStatus::Idle);
        assert!(c.player().cues().is_empty());
    }

    #[test]
    fn select_without_countdown_starts_running() {
        let mut c = controller(3, 0);
        let events = c.select_pattern(&find_pattern("box").unwrap(), None).unwrap();
        assert!(matches!(events[0], Event::SessionStarted { .. }));
        assert_eq!(c.status(), SessionStatus::Running);
        assert_eq!(c.phase(), Some(Phase::Inhale));
        assert_eq!(c.remaining_ms(), 4000);
        assert_eq!(c.player().cues(), vec![AudioCue::Inhale]);
    }

    #[test]
    fn countdown_precedes_session() {
        let mut c = controller(1, 3);
        c.select_pattern(&find_pattern("box").unwrap(), None).unwrap();
        assert_eq!(c.status(), SessionStatus::CountingDown);
        assert_eq!(c.countdown_display(), Some(3));

        for _ in 0..29 {
            tick(&mut c);
        }
        assert_eq!(c.status(), SessionStatus::CountingDown);
        let events = tick(&mut c);
        assert!(matches!(events[0], Event::SessionStarted { .. }));
        assert_eq!(c.player().count(AudioCue::Countdown), 3);
    }

    #[test]
    fn remaining_time_decrements_by_tick() {
        let mut c = controller(3, 0);
        c.select_pattern(&find_pattern("box").unwrap(), None).unwrap();
        tick(&mut c);
        tick(&mut c);
        assert_eq!(c.remaining_ms(), 3800);
    }

    #[test]
    fn pause_preserves_remaining_time() {
        let mut c = controller(3, 0);
        c.select_pattern(&find_pattern("4-7-8").unwrap(), None).unwrap();
        for _ in 0..13 {
            tick(&mut c);
        }
        c.pause().unwrap();
        let frozen = c.remaining_ms();
        for _ in 0..50 {
            assert!(tick(&mut c).is_empty());
        }
        assert_eq!(c.remaining_ms(), frozen);
        c.resume().unwrap();
        assert_eq!(c.remaining_ms(), frozen);
        tick(&mut c);
        assert_eq!(c.remaining_ms(), frozen - 100);
    }

    #[test]
    fn reset_returns_to_initial_phase() {
        let mut c = controller(5, 0);
        c.select_pattern(&find_pattern("box").unwrap(), None).unwrap();
        for _ in 0..200 {
            tick(&mut c);
        }
        assert!(c.cycles_completed() > 0);
        c.reset().unwrap();
        assert_eq!(c.phase(), Some(Phase::Inhale));
        assert_eq!(c.remaining_ms(), 4000);
        assert_eq!(c.cycles_completed(), 0);
        assert_eq!(c.status(), SessionStatus::Paused);
        assert_eq!(c.pattern().unwrap().id, "box");
    }

    #[test]
    fn completion_freezes_session() {
        let mut c = controller(1, 0);
        c.select_pattern(&find_pattern("coherent").unwrap(), None).unwrap();
        let mut completed = None;
        for _ in 0..100 {
            for e in tick(&mut c) {
                if let Event::SessionCompleted { summary } = e {
                    completed = Some(summary);
                }
            }
        }
        let summary = completed.expect("session should complete");
        assert_eq!(summary.cycles, 1);
        assert_eq!(summary.duration_ms, 10_000);
        assert_eq!(c.status(), SessionStatus::Completed);
        assert_eq!(c.cycles_completed(), 0);
        assert_eq!(c.phase(), Some(Phase::Exhale));
        assert!(c.resume().is_none());
        assert!(tick(&mut c).is_empty());
    }

    #[test]
    fn resume_after_reset_restarts_run() {
        let mut c = controller(1, 0);
        c.select_pattern(&find_pattern("coherent").unwrap(), None).unwrap();
        for _ in 0..100 {
            tick(&mut c);
        }
        let first = c.summary().unwrap().session_id;
        c.reset();
        c.resume().unwrap();
        assert_eq!(c.status(), SessionStatus::Running);
        assert_ne!(c.state().unwrap().session_id, first);
        assert_eq!(c.player().count(AudioCue::Inhale), 2);
    }

    #[test]
    fn exit_discards_session() {
        let mut c = controller(3, 0);
        c.select_pattern(&find_pattern("box").unwrap(), None).unwrap();
        assert!(c.exit().is_some());
        assert_eq!(c.status(), SessionStatus::Idle);
        assert!(c.pattern().is_none());
    }

    #[test]
    fn custom_overrides_apply_at_start() {
        let mut c = controller(1, 3);
        let sliders = CustomDurations {
            inhale: 6,
            hold1: 0,
            exhale: 3,
            hold2: 0,
        };
        c.select_pattern(&find_pattern(CUSTOM_PATTERN_ID).unwrap(), Some(&sliders))
            .unwrap();
        for _ in 0..30 {
            tick(&mut c);
        }
        assert_eq!(c.remaining_ms(), 6000);
        assert_eq!(c.pattern().unwrap().hold1_secs, None);
    }

    #[test]
    fn invalid_custom_durations_are_rejected() {
        let mut c = controller(1, 0);
        let sliders = CustomDurations {
            inhale: 0,
            ..CustomDurations::default()
        };
        let result = c.select_pattern(&find_pattern(CUSTOM_PATTERN_ID).unwrap(), Some(&sliders));
        assert!(result.is_err());
        assert_eq!(c.status(), SessionStatus::Idle);
    }

    #[test]
    fn cycles_out_of_range_are_rejected() {
        let mut c = controller(11, 0);
        assert!(matches!(
            c.select_pattern(&find_pattern("box").unwrap(), None),
            Err(ValidationError::CyclesOutOfRange { value: 11, .. })
        ));
    }

    #[test]
    fn counter_voice_announces_numbers() {
        let mut c = SessionController::new(
            SessionSettings {
                target_cycles: 1,
                countdown_secs: 0,
                counter: CounterSettings {
                    enabled: true,
                    frequency: CounterFrequency::EverySecond,
                    sound: CounterSound::Voice,
                },
                ..SessionSettings::default()
            },
            RecordingPlayer::new(),
            ManualClock::default(),
        );
        c.select_pattern(&find_pattern("coherent").unwrap(), None).unwrap();
        for _ in 0..50 {
            c.tick();
        }
        let voices: Vec<_> = c
            .player()
            .cues()
            .into_iter()
            .filter_map(|cue| match cue {
                AudioCue::CounterVoice(n) => Some(n),
                _ => None,
            })
            .collect();
        assert_eq!(voices, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn reset_during_countdown_holds_until_resume() {
        let mut c = controller(1, 3);
        c.select_pattern(&find_pattern("box").unwrap(), None).unwrap();
        for _ in 0..15 {
            tick(&mut c);
        }
        assert!(matches!(c.reset(), Some(Event::SessionReset { .. })));
        assert!(!c.is_ticking());
        assert_eq!(c.countdown_display(), Some(3));
        for _ in 0..100 {
            assert!(tick(&mut c).is_empty());
        }
        assert_eq!(c.status(), SessionStatus::CountingDown);

        assert!(matches!(c.resume(), Some(Event::SessionResumed { .. })));
        for _ in 0..29 {
            tick(&mut c);
        }
        assert_eq!(c.status(), SessionStatus::CountingDown);
        tick(&mut c);
        assert_eq!(c.status(), SessionStatus::Running);
    }

    #[test]
    fn overlong_custom_phase_is_rejected_at_select() {
        let mut c = SessionController::new(
            SessionSettings {
                target_cycles: 1,
                countdown_secs: 0,
                counter: CounterSettings {
                    enabled: true,
                    frequency: CounterFrequency::QuarterPoints,
                    sound: CounterSound::Beep,
                },
                ..SessionSettings::default()
            },
            RecordingPlayer::new(),
            ManualClock::default(),
        );
        let sliders = CustomDurations {
            inhale: 1_500_000_000,
            ..CustomDurations::default()
        };
        let result = c.select_pattern(&find_pattern(CUSTOM_PATTERN_ID).unwrap(), Some(&sliders));
        assert!(matches!(result, Err(ValidationError::InvalidValue { .. })));
        assert_eq!(c.status(), SessionStatus::Idle);
    }

    #[test]
    fn tick_step_is_bounded() {
        let settings = SessionSettings {
            tick_ms: 10_000_000_000_000_000,
            ..SessionSettings::default()
        };
        assert!(settings.validate().is_err());
        let settings = SessionSettings {
            tick_ms: MAX_TICK_MS,
            ..SessionSettings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn phase_progress_tracks_remaining_time() {
        let mut c = controller(1, 0);
        assert_eq!(c.phase_progress(), 0.0);
        c.select_pattern(&find_pattern("box").unwrap(), None).unwrap();
        assert_eq!(c.phase_progress(), 0.0);
        for _ in 0..10 {
            tick(&mut c);
        }
        assert!((c.phase_progress() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn set_counter_mid_phase_keeps_last_count() {
        let mut c = controller(1, 0);
        let beeps = CounterSettings {
            enabled: true,
            frequency: CounterFrequency::EverySecond,
            sound: CounterSound::Beep,
        };
        c.set_counter(beeps);
        c.select_pattern(&find_pattern("box").unwrap(), None).unwrap();
        for _ in 0..15 {
            tick(&mut c);
        }
        assert_eq!(c.player().count(AudioCue::CounterBeep), 2);

        c.set_counter(CounterSettings {
            sound: CounterSound::Tone,
            ..beeps
        });
        let counts: Vec<u32> = (0..10)
            .flat_map(|_| tick(&mut c))
            .filter_map(|e| match e {
                Event::CounterTick { count, .. } => Some(count),
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![3]);
        assert_eq!(c.player().count(AudioCue::CounterTone), 1);
        assert_eq!(c.player().count(AudioCue::CounterBeep), 2);
    }

    #[test]
    fn toggle_flips_running() {
        let mut c = controller(3, 0);
        c.select_pattern(&find_pattern("box").unwrap(), None).unwrap();
        assert!(matches!(c.toggle(), Some(Event::SessionPaused { .. })));
        assert!(matches!(c.toggle(), Some(Event::SessionResumed { .. })));
    }

    #[test]
    fn countdown_can_be_paused() {
        let mut c = controller(1, 3);
        c.select_pattern(&find_pattern("box").unwrap(), None).unwrap();
        tick(&mut c);
        c.pause().unwrap();
        for _ in 0..40 {
            tick(&mut c);
        }
        assert_eq!(c.status(), SessionStatus::CountingDown);
        c.resume().unwrap();
        for _ in 0..29 {
            tick(&mut c);
        }
        assert_eq!(c.status(), SessionStatus::Running);
    }
}
