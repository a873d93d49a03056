//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Session defaults (pattern, cycle target, countdown, tick step)
//! - Counter behaviour
//! - Audio on/off
//! - Slider values for the custom pattern
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::breathing::{
    find_pattern, CounterFrequency, CounterSettings, CounterSound, CustomDurations,
    SessionSettings, CUSTOM_PATTERN_ID, DEFAULT_COUNTDOWN_SECS, DEFAULT_TICK_MS,
};
use crate::error::{ConfigError, CoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_pattern")]
    pub default_pattern: String,
    #[serde(default = "default_cycles")]
    pub cycles: u32,
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u32,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CounterConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub frequency: CounterFrequency,
    #[serde(default)]
    pub sound: CounterSound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ring the terminal bell on phase cues.
    #[serde(default = "default_true")]
    pub bell: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub counter: CounterConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub custom: CustomDurations,
}

fn default_pattern() -> String {
    "box".into()
}
fn default_cycles() -> u32 {
    3
}
fn default_countdown_secs() -> u32 {
    DEFAULT_COUNTDOWN_SECS
}
fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}
fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_pattern: default_pattern(),
            cycles: default_cycles(),
            countdown_secs: default_countdown_secs(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the resulting configuration
    /// does not validate.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        self.session_settings()
            .validate()
            .map_err(|e| invalid("session", e.to_string()))?;
        find_pattern(&self.session.default_pattern)
            .map_err(|e| invalid("session.default_pattern", e.to_string()))?;
        find_pattern(CUSTOM_PATTERN_ID)
            .and_then(|p| p.snapshot(Some(&self.custom)).validate())
            .map_err(|e| invalid("custom", e.to_string()))?;
        Ok(())
    }

    pub fn counter_settings(&self) -> CounterSettings {
        CounterSettings {
            enabled: self.counter.enabled,
            frequency: self.counter.frequency,
            sound: self.counter.sound,
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            target_cycles: self.session.cycles,
            countdown_secs: self.session.countdown_secs,
            tick_ms: self.session.tick_ms,
            counter: self.counter_settings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.session.cycles, 3);
        assert_eq!(parsed.counter.frequency, CounterFrequency::EverySecond);
        assert_eq!(parsed.custom, CustomDurations::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[counter]\nenabled = true\nsound = \"voice\"\n").unwrap();
        assert!(parsed.counter.enabled);
        assert_eq!(parsed.counter.sound, CounterSound::Voice);
        assert_eq!(parsed.session.tick_ms, 100);
        assert!(parsed.audio.enabled);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.cycles").as_deref(), Some("3"));
        assert_eq!(cfg.get("counter.frequency").as_deref(), Some("every-second"));
        assert_eq!(cfg.get("session.default_pattern").as_deref(), Some("box"));
        assert!(cfg.get("session.missing").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("counter.enabled", "true").unwrap();
        cfg.apply("counter.frequency", "half-way").unwrap();
        cfg.apply("custom.hold2", "0").unwrap();
        assert!(cfg.counter.enabled);
        assert_eq!(cfg.counter.frequency, CounterFrequency::HalfWay);
        assert_eq!(cfg.custom.hold2, 0);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("session.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn apply_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.apply("session.cycles", "11").is_err());
        assert!(cfg.apply("session.cycles", "0").is_err());
        assert!(cfg.apply("audio.enabled", "loud").is_err());
        assert!(cfg.apply("counter.frequency", "sometimes").is_err());
        assert!(cfg.apply("session.default_pattern", "nope").is_err());
        assert!(cfg.apply("custom.inhale", "0").is_err());
        assert_eq!(cfg.session.cycles, 3);
    }

    #[test]
    fn load_from_missing_file_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.session.default_pattern, "box");
        assert!(path.exists());
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "session = 12").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }

    #[test]
    fn session_settings_reflect_config() {
        let mut cfg = Config::default();
        cfg.apply("session.cycles", "7").unwrap();
        cfg.apply("counter.sound", "tone").unwrap();
        let settings = cfg.session_settings();
        assert_eq!(settings.target_cycles, 7);
        assert_eq!(settings.counter.sound, CounterSound::Tone);
    }

    #[test]
    fn rejects_out_of_range_tick_and_durations() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("session.tick_ms", "10000000000000000"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.apply("session.tick_ms", "60001").is_err());
        assert!(cfg.apply("custom.inhale", "1500000000").is_err());
        assert!(cfg.apply("custom.hold1", "301").is_err());
        assert_eq!(cfg.session.tick_ms, 100);
        assert_eq!(cfg.custom, CustomDurations::default());

        cfg.apply("session.tick_ms", "60000").unwrap();
        cfg.apply("custom.exhale", "300").unwrap();
    }
}
