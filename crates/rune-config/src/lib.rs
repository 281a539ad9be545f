//! Rune navigation configuration system
//!
//! This crate provides centralized configuration management for the view
//! navigation engine, loading settings from `rune.toml` with environment
//! variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading `rune.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuneConfig {
    /// Navigation engine settings
    pub navigation: NavigationConfig,
    /// Default show/hide transition timings
    pub transitions: TransitionsConfig,
    /// Log filter for the demo binary
    pub logging: LoggingConfig,
}

/// Navigation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NavigationConfig {
    /// Skip every transition regardless of per-call flags
    pub skip_animations: bool,
    /// Path to a JSON view document describing the tree
    pub document: Option<PathBuf>,
}

/// Timing for one transition direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionTiming {
    pub duration_ms: f32,
    pub delay_ms: f32,
    /// CSS easing name (linear, ease, ease-in, ease-out, ease-in-out)
    pub easing: String,
}

/// Show and hide timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionsConfig {
    pub show: TransitionTiming,
    pub hide: TransitionTiming,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// env_logger filter directive (e.g. "info", "rune_nav=trace")
    pub filter: String,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            duration_ms: 250.0,
            delay_ms: 0.0,
            easing: "ease-out".to_string(),
        }
    }
}

impl Default for TransitionsConfig {
    fn default() -> Self {
        Self {
            show: TransitionTiming::default(),
            hide: TransitionTiming {
                duration_ms: 200.0,
                delay_ms: 0.0,
                easing: "ease-in".to_string(),
            },
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl RuneConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from the default location (rune.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("rune.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("RUNE_NAV_SKIP_ANIMATIONS") {
            self.navigation.skip_animations = parse_flag(&val);
        }
        if let Ok(path) = std::env::var("RUNE_NAV_DOCUMENT") {
            self.navigation.document = Some(PathBuf::from(path));
        }

        if let Ok(val) = std::env::var("RUNE_NAV_SHOW_MS") {
            if let Ok(ms) = val.parse::<f32>() {
                self.transitions.show.duration_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("RUNE_NAV_HIDE_MS") {
            if let Ok(ms) = val.parse::<f32>() {
                self.transitions.hide.duration_ms = ms;
            }
        }

        if let Ok(filter) = std::env::var("RUNE_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RuneConfig::default();
        assert!(!config.navigation.skip_animations);
        assert!(config.navigation.document.is_none());
        assert_eq!(config.transitions.show.easing, "ease-out");
        assert_eq!(config.transitions.hide.duration_ms, 200.0);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_toml_serialization() {
        let config = RuneConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: RuneConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.transitions, config.transitions);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[navigation]\nskip_animations = true\n\n[transitions.show]\nduration_ms = 120.0"
        )
        .unwrap();

        let config = RuneConfig::load_from_file(file.path()).unwrap();
        assert!(config.navigation.skip_animations);
        assert_eq!(config.transitions.show.duration_ms, 120.0);
        assert_eq!(config.transitions.show.easing, "ease-out");
        assert_eq!(config.transitions.hide.easing, "ease-in");
    }

    #[test]
    fn test_load_errors() {
        let missing = RuneConfig::load_from_file("/definitely/not/here/rune.toml");
        assert!(matches!(missing, Err(ConfigError::Io(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[navigation\nskip_animations = ").unwrap();
        let bad = RuneConfig::load_from_file(file.path());
        assert!(matches!(bad, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("RUNE_NAV_SKIP_ANIMATIONS", "true");
            std::env::set_var("RUNE_NAV_HIDE_MS", "90");
            std::env::set_var("RUNE_NAV_SHOW_MS", "not-a-number");
        }

        let mut config = RuneConfig::default();
        config.merge_with_env();

        assert!(config.navigation.skip_animations);
        assert_eq!(config.transitions.hide.duration_ms, 90.0);
        assert_eq!(config.transitions.show.duration_ms, 250.0);

        unsafe {
            std::env::remove_var("RUNE_NAV_SKIP_ANIMATIONS");
            std::env::remove_var("RUNE_NAV_HIDE_MS");
            std::env::remove_var("RUNE_NAV_SHOW_MS");
        }
    }
}
