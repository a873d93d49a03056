//! Tick scheduling for the breathing controller.
//!
//! [`run_realtime`] arms a tokio interval while the controller wants ticks and
//! disarms it when paused, so a paused session costs nothing and resumes a
//! full tick later. [`simulate`] runs the same loop against a [`ManualClock`]
//! without waiting, which is what tests and the `simulate` command use.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use crate::audio::CuePlayer;
use crate::breathing::{SessionController, SessionStatus, SessionSummary};
use crate::clock::{Clock, ManualClock};
use crate::events::Event;

/// User actions delivered to a running driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCommand {
    Toggle,
    Pause,
    Resume,
    Reset,
    Quit,
}

impl DriverCommand {
    /// Parse a single line of terminal input.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" | "" => Some(DriverCommand::Toggle),
            "resume" | "play" => Some(DriverCommand::Resume),
            "r" | "reset" => Some(DriverCommand::Reset),
            "q" | "quit" | "exit" => Some(DriverCommand::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DriverOutcome {
    Completed(SessionSummary),
    Exited,
}

/// Run the controller in real time until the session completes or the user quits.
pub async fn run_realtime<P, C, F>(
    controller: &mut SessionController<P, C>,
    mut commands: mpsc::Receiver<DriverCommand>,
    mut on_event: F,
) -> DriverOutcome
where
    P: CuePlayer,
    C: Clock,
    F: FnMut(&Event),
{
    let period = Duration::from_millis(controller.settings().tick_ms);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first interval tick fires immediately; swallow it
    ticker.tick().await;
    let mut commands_open = true;

    loop {
        let ticking = controller.is_ticking();
        if !ticking && !commands_open {
            break;
        }

        tokio::select! {
            _ = ticker.tick(), if ticking => {
                for event in controller.tick() {
                    on_event(&event);
                }
                if let Some(summary) = controller.summary() {
                    return DriverOutcome::Completed(summary.clone());
                }
            }
            command = commands.recv(), if commands_open => {
                let event = match command {
                    Some(DriverCommand::Toggle) => controller.toggle(),
                    Some(DriverCommand::Pause) => controller.pause(),
                    Some(DriverCommand::Resume) => controller.resume(),
                    Some(DriverCommand::Reset) => controller.reset(),
                    Some(DriverCommand::Quit) => {
                        if let Some(event) = controller.exit() {
                            on_event(&event);
                        }
                        return DriverOutcome::Exited;
                    }
                    None => {
                        commands_open = false;
                        None
                    }
                };
                if let Some(event) = event {
                    tracing::debug!(?event, "driver command applied");
                    on_event(&event);
                }
                if controller.is_ticking() && !ticking {
                    ticker.reset();
                }
            }
        }
    }

    match controller.status() {
        SessionStatus::Completed => controller
            .summary()
            .cloned()
            .map(DriverOutcome::Completed)
            .unwrap_or(DriverOutcome::Exited),
        _ => DriverOutcome::Exited,
    }
}

/// Drive the controller to completion in simulated time.
///
/// Each tick moves the manual clock forward by the tick step, so elapsed
/// durations in the summary match what a real-time run would report.
/// Stops after `max_ticks` ticks, when the session completes, or when the
/// controller stops asking for ticks.
pub fn simulate<P: CuePlayer>(
    controller: &mut SessionController<P, ManualClock>,
    max_ticks: usize,
) -> Vec<Event> {
    let step = controller.settings().tick_ms;
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        if !controller.is_ticking() {
            break;
        }
        controller.clock().advance_ms(step);
        events.extend(controller.tick());
        if controller.summary().is_some() {
            break;
        }
    }
    events
}
