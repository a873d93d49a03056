use heartsheal_core::Database;

pub fn run(limit: usize, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let sessions = db.recent_sessions(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }
    if sessions.is_empty() {
        println!("No sessions yet.");
        return Ok(());
    }
    for s in &sessions {
        let secs = s.duration_ms / 1000;
        println!(
            "{}  {:<18} {:>2} cycles  {}:{:02}",
            s.completed_at.format("%Y-%m-%d %H:%M"),
            s.pattern_id,
            s.cycles,
            secs / 60,
            secs % 60
        );
    }
    Ok(())
}
