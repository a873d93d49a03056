use heartsheal_core::{
    simulate, Config, Database, Event, ManualClock, SessionController, SilentPlayer,
};

use super::SessionOptions;

/// Upper bound on simulated ticks; 10 cycles of the longest pattern need far fewer.
const MAX_TICKS: usize = 1_000_000;

#[derive(clap::Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub session: SessionOptions,
    /// Save the completed session to history
    #[arg(long)]
    pub record: bool,
    /// Print only the final summary
    #[arg(long)]
    pub summary_only: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let pattern = args.session.pattern(&config)?;
    let custom = args.session.custom(&config);
    let settings = args.session.settings(&config);

    let mut controller = SessionController::new(settings, SilentPlayer, ManualClock::default());
    let mut events = controller.select_pattern(&pattern, Some(&custom))?;
    events.extend(simulate(&mut controller, MAX_TICKS));

    if !args.summary_only {
        for event in &events {
            println!("{}", serde_json::to_string(event)?);
        }
    }

    let summary = events.iter().find_map(|event| match event {
        Event::SessionCompleted { summary } => Some(summary),
        _ => None,
    });
    match summary {
        Some(summary) => {
            if args.summary_only {
                println!("{}", serde_json::to_string_pretty(summary)?);
            }
            if args.record {
                let db = Database::open()?;
                db.record_session(summary)?;
            }
        }
        None => return Err("simulation stopped before the session completed".into()),
    }
    Ok(())
}
