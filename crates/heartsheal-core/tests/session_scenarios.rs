//! End-to-end breathing sessions driven in simulated time.

use heartsheal_core::{
    find_pattern, simulate, AudioCue, BreathingStatsAnalyzer, CounterFrequency, CounterSettings,
    CounterSound, Database, Event, ManualClock, Phase, RecordingPlayer, SessionController,
    SessionSettings, SessionStatus,
};

fn controller(cycles: u32, counter: CounterSettings) -> SessionController<RecordingPlayer, ManualClock> {
    SessionController::new(
        SessionSettings {
            target_cycles: cycles,
            countdown_secs: 0,
            tick_ms: 100,
            counter,
        },
        RecordingPlayer::new(),
        ManualClock::default(),
    )
}

/// Phases in the order they were entered, starting with the initial phase.
fn entered_phases(events: &[Event]) -> Vec<Phase> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::SessionStarted { phase, .. } => Some(*phase),
            Event::PhaseChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect()
}

fn cycle_events(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::CycleCompleted { .. }))
        .count()
}

#[test]
fn box_breathing_three_cycles_cues() {
    let mut c = controller(3, CounterSettings::default());
    c.select_pattern(&find_pattern("box").unwrap(), None).unwrap();
    let events = simulate(&mut c, 10_000);

    let player = c.player();
    let phase_cues = player.count(AudioCue::Inhale)
        + player.count(AudioCue::Hold)
        + player.count(AudioCue::Exhale);
    assert_eq!(phase_cues, 4 * 3);
    assert_eq!(player.count(AudioCue::Inhale), 3);
    assert_eq!(player.count(AudioCue::Hold), 6);
    assert_eq!(player.count(AudioCue::Exhale), 3);
    assert_eq!(player.count(AudioCue::Completion), 1);
    assert_eq!(player.cues().last(), Some(&AudioCue::Completion));

    assert_eq!(cycle_events(&events), 3);
    assert_eq!(c.status(), SessionStatus::Completed);
    assert_eq!(c.cycles_completed(), 0);
    assert!(!c.is_running());

    let summary = c.summary().unwrap();
    assert_eq!(summary.cycles, 3);
    assert_eq!(summary.duration_ms, 48_000);
}

#[test]
fn four_seven_eight_single_cycle_sequence() {
    let mut c = controller(1, CounterSettings::default());
    c.select_pattern(&find_pattern("4-7-8").unwrap(), None).unwrap();
    let mut events = vec![c.snapshot()];
    events.extend(simulate(&mut c, 10_000));

    let durations: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            Event::PhaseChanged { duration_ms, .. } => Some(*duration_ms),
            _ => None,
        })
        .collect();
    assert_eq!(durations, vec![7_000, 8_000]);
    assert_eq!(c.summary().unwrap().duration_ms, 19_000);
    assert!(matches!(events.last(), Some(Event::SessionCompleted { .. })));
}

#[test]
fn four_seven_eight_returns_to_inhale_without_hold2() {
    let mut c = controller(2, CounterSettings::default());
    let mut events = c
        .select_pattern(&find_pattern("4-7-8").unwrap(), None)
        .unwrap();
    events.extend(simulate(&mut c, 10_000));

    assert_eq!(
        entered_phases(&events),
        vec![
            Phase::Inhale,
            Phase::Hold1,
            Phase::Exhale,
            Phase::Inhale,
            Phase::Hold1,
            Phase::Exhale
        ]
    );
    assert!(!entered_phases(&events).contains(&Phase::Hold2));
}

#[test]
fn alternate_nostril_two_cycles() {
    let mut c = controller(2, CounterSettings::default());
    let mut events = c
        .select_pattern(&find_pattern("alternate-nostril").unwrap(), None)
        .unwrap();
    events.extend(simulate(&mut c, 10_000));

    let trace: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            Event::SessionStarted { phase, .. } | Event::PhaseChanged { to: phase, .. } => {
                Some(format!("{phase:?}"))
            }
            Event::CycleCompleted { .. } => Some("cycle".into()),
            Event::SessionCompleted { .. } => Some("done".into()),
            _ => None,
        })
        .collect();
    assert_eq!(
        trace,
        vec![
            "LeftNostril",
            "RightNostril",
            "cycle",
            "LeftNostril",
            "RightNostril",
            "cycle",
            "done"
        ]
    );
    assert_eq!(c.summary().unwrap().duration_ms, 16_000);
}

#[test]
fn every_second_counter_over_seven_second_hold() {
    let counter = CounterSettings {
        enabled: true,
        frequency: CounterFrequency::EverySecond,
        sound: CounterSound::Beep,
    };
    let mut c = controller(1, counter);
    c.select_pattern(&find_pattern("4-7-8").unwrap(), None).unwrap();
    let events = simulate(&mut c, 10_000);

    let hold_counts: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            Event::CounterTick {
                phase: Phase::Hold1,
                count,
                ..
            } => Some(*count),
            _ => None,
        })
        .collect();
    assert_eq!(hold_counts, vec![1, 2, 3, 4, 5, 6, 7]);
    // 4 + 7 + 8 beeps across the three phases
    assert_eq!(c.player().count(AudioCue::CounterBeep), 19);
}

#[test]
fn half_way_counter_on_box() {
    let counter = CounterSettings {
        enabled: true,
        frequency: CounterFrequency::HalfWay,
        sound: CounterSound::Voice,
    };
    let mut c = controller(1, counter);
    c.select_pattern(&find_pattern("box").unwrap(), None).unwrap();
    let events = simulate(&mut c, 10_000);

    let counts: Vec<(Phase, u32)> = events
        .iter()
        .filter_map(|e| match e {
            Event::CounterTick { phase, count, .. } => Some((*phase, *count)),
            _ => None,
        })
        .collect();
    assert_eq!(
        counts,
        vec![
            (Phase::Inhale, 2),
            (Phase::Inhale, 4),
            (Phase::Hold1, 2),
            (Phase::Hold1, 4),
            (Phase::Exhale, 2),
            (Phase::Exhale, 4),
            (Phase::Hold2, 2),
            (Phase::Hold2, 4),
        ]
    );
    assert_eq!(c.player().count(AudioCue::CounterVoice(4)), 4);
}

#[test]
fn pause_mid_phase_preserves_remaining_time() {
    let mut c = controller(2, CounterSettings::default());
    c.select_pattern(&find_pattern("coherent").unwrap(), None).unwrap();
    simulate(&mut c, 23);
    let before = c.remaining_ms();
    assert_eq!(before, 2_700);

    c.pause().unwrap();
    assert!(simulate(&mut c, 500).is_empty());
    assert_eq!(c.remaining_ms(), before);

    c.resume().unwrap();
    assert_eq!(c.remaining_ms(), before);
    simulate(&mut c, 1);
    assert_eq!(c.remaining_ms(), before - 100);
}

#[test]
fn completed_session_is_persisted_and_counted() {
    let db = Database::open_memory().unwrap();
    let mut c = controller(2, CounterSettings::default());
    c.select_pattern(&find_pattern("relaxing").unwrap(), None).unwrap();
    let events = simulate(&mut c, 10_000);

    for event in &events {
        if let Event::SessionCompleted { summary } = event {
            db.record_session(summary).unwrap();
        }
    }

    let records = db.all_sessions().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].pattern_id, "relaxing");
    assert_eq!(records[0].duration_ms, 20_000);

    let today = records[0].completed_at.date_naive();
    let stats = BreathingStatsAnalyzer::new().analyze(&records, today);
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.total_cycles, 2);
    assert_eq!(stats.current_streak_days, 1);
}
