pub mod breathe;
pub mod config;
pub mod history;
pub mod patterns;
pub mod simulate;
pub mod stats;

use heartsheal_core::{
    find_pattern, BreathingPattern, Config, CounterFrequency, CounterSound, CustomDurations,
    SessionSettings,
};
use serde::de::DeserializeOwned;

/// Session options shared by `breathe` and `simulate`.
#[derive(clap::Args, Debug, Default)]
pub struct SessionOptions {
    /// Pattern id (defaults to session.default_pattern)
    pub pattern: Option<String>,
    /// Number of cycles (1-10)
    #[arg(long)]
    pub cycles: Option<u32>,
    /// Announce sub-counts within each phase
    #[arg(long)]
    pub counter: bool,
    /// Counter frequency: every-second, half-way, quarter-points
    #[arg(long, value_parser = parse_setting::<CounterFrequency>)]
    pub frequency: Option<CounterFrequency>,
    /// Counter sound: beep, tone, voice, none
    #[arg(long, value_parser = parse_setting::<CounterSound>)]
    pub sound: Option<CounterSound>,
    /// Start without the 3-2-1 countdown
    #[arg(long)]
    pub no_countdown: bool,
    #[command(flatten)]
    pub durations: DurationOverrides,
}

impl SessionOptions {
    /// Configured settings with command-line flags applied.
    pub fn settings(&self, config: &Config) -> SessionSettings {
        let mut settings = config.session_settings();
        if let Some(cycles) = self.cycles {
            settings.target_cycles = cycles;
        }
        if self.counter {
            settings.counter.enabled = true;
        }
        if let Some(frequency) = self.frequency {
            settings.counter.frequency = frequency;
        }
        if let Some(sound) = self.sound {
            settings.counter.sound = sound;
        }
        if self.no_countdown {
            settings.countdown_secs = 0;
        }
        settings
    }

    pub fn pattern(&self, config: &Config) -> Result<BreathingPattern, Box<dyn std::error::Error>> {
        resolve_pattern(self.pattern.as_deref(), config)
    }

    pub fn custom(&self, config: &Config) -> CustomDurations {
        self.durations.merge(config.custom)
    }
}

/// Parse a setting through its serde name (e.g. "half-way").
fn parse_setting<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("unsupported value '{value}'"))
}

/// Slider overrides for the custom pattern.
#[derive(clap::Args, Debug, Default)]
pub struct DurationOverrides {
    /// Inhale seconds (custom pattern only)
    #[arg(long)]
    pub inhale: Option<u32>,
    /// Hold after inhale, seconds (custom pattern only)
    #[arg(long)]
    pub hold1: Option<u32>,
    /// Exhale seconds (custom pattern only)
    #[arg(long)]
    pub exhale: Option<u32>,
    /// Hold after exhale, seconds (custom pattern only)
    #[arg(long)]
    pub hold2: Option<u32>,
}

impl DurationOverrides {
    /// Layer command-line sliders over the configured ones.
    pub fn merge(&self, base: CustomDurations) -> CustomDurations {
        CustomDurations {
            inhale: self.inhale.unwrap_or(base.inhale),
            hold1: self.hold1.unwrap_or(base.hold1),
            exhale: self.exhale.unwrap_or(base.exhale),
            hold2: self.hold2.unwrap_or(base.hold2),
        }
    }
}

/// Resolve the pattern to run: the explicit id or the configured default.
pub fn resolve_pattern(
    id: Option<&str>,
    config: &Config,
) -> Result<BreathingPattern, Box<dyn std::error::Error>> {
    let id = id.unwrap_or(&config.session.default_pattern);
    Ok(find_pattern(id)?)
}
