use heartsheal_core::{
    run_realtime, Config, Database, DriverCommand, DriverOutcome, Event, SessionController,
    SessionSummary, SystemClock,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::SessionOptions;
use crate::terminal::{render, TerminalPlayer};

#[derive(clap::Args)]
pub struct BreatheArgs {
    #[command(flatten)]
    pub session: SessionOptions,
    /// Do not save the completed session to history
    #[arg(long)]
    pub no_record: bool,
}

fn print_event(event: &Event) {
    if let Some(line) = render(event) {
        println!("{line}");
    }
}

/// Save a finished session. Failures are logged and otherwise ignored.
fn record(summary: &SessionSummary) {
    let result = Database::open().and_then(|db| Ok(db.record_session(summary)?));
    if let Err(e) = result {
        tracing::warn!(error = %e, session = %summary.session_id, "failed to save session");
    }
}

pub fn run(args: BreatheArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let pattern = args.session.pattern(&config)?;
    let custom = args.session.custom(&config);
    let settings = args.session.settings(&config);

    let mut controller =
        SessionController::new(settings, TerminalPlayer::new(&config.audio), SystemClock);
    let started = controller.select_pattern(&pattern, Some(&custom))?;

    println!("{} ({})", pattern.name, pattern.rhythm_label());
    println!("Enter: p pause/resume, r reset, q quit");
    for event in &started {
        print_event(event);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(async {
        let (tx, rx) = mpsc::channel(16);

        let stdin_tx = tx.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                match DriverCommand::parse(&line) {
                    Some(command) => {
                        if stdin_tx.send(command).await.is_err() {
                            break;
                        }
                    }
                    None => eprintln!("unknown command: {}", line.trim()),
                }
            }
        });

        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = tx.send(DriverCommand::Quit).await;
            }
        });

        run_realtime(&mut controller, rx, print_event).await
    });
    // stdin reads block a worker thread; don't wait for them
    runtime.shutdown_background();

    match outcome {
        DriverOutcome::Completed(summary) => {
            if !args.no_record {
                record(&summary);
            }
        }
        DriverOutcome::Exited => tracing::info!("session ended before completion"),
    }
    Ok(())
}
