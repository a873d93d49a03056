use chrono::Utc;
use clap::Subcommand;
use heartsheal_core::{BreathingStatsAnalyzer, Database};
use serde_json::json;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// All-time stats
    All,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let records = db.all_sessions()?;
    let stats = BreathingStatsAnalyzer::new().analyze(&records, Utc::now().date_naive());

    match action {
        StatsAction::Today => {
            let today = json!({
                "sessions": stats.today_sessions,
                "duration_ms": stats.today_duration_ms,
                "current_streak_days": stats.current_streak_days,
            });
            println!("{}", serde_json::to_string_pretty(&today)?);
        }
        StatsAction::All => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
