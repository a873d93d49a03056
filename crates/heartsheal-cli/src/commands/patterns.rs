use clap::Subcommand;
use heartsheal_core::{builtin_patterns, find_pattern};

#[derive(Subcommand)]
pub enum PatternsAction {
    /// List the pattern catalog
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one pattern
    Show {
        /// Pattern id (e.g. "box", "4-7-8")
        id: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: PatternsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PatternsAction::List { json } => {
            let patterns = builtin_patterns();
            if json {
                println!("{}", serde_json::to_string_pretty(&patterns)?);
                return Ok(());
            }
            for p in patterns {
                println!(
                    "{:<18} {:<10} {:<26} {}",
                    p.id,
                    p.rhythm_label(),
                    p.name,
                    p.description
                );
            }
        }
        PatternsAction::Show { id, json } => {
            let p = find_pattern(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&p)?);
                return Ok(());
            }
            println!("{} ({})", p.name, p.id);
            println!("  rhythm:   {}", p.rhythm_label());
            println!("  cycle:    {}s", p.cycle_secs());
            println!("  cycles:   {} recommended", p.recommended_cycles);
            println!("  category: {:?}", p.category);
            if !p.description.is_empty() {
                println!("  {}", p.description);
            }
        }
    }
    Ok(())
}
