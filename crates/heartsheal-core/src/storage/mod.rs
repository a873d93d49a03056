mod config;
pub mod database;
pub mod migrations;

pub use config::{AudioConfig, Config, CounterConfig, SessionConfig};
pub use database::{Database, SessionRecord};

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `HEARTSHEAL_DATA_DIR` wins when set. Otherwise `~/.config/heartsheal[-dev]/`,
/// where `HEARTSHEAL_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("HEARTSHEAL_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HEARTSHEAL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("heartsheal-dev")
            } else {
                base_dir.join("heartsheal")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
