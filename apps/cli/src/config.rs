//! Layered CLI configuration
//!
//! Sources, lowest priority first: built-in defaults, a TOML file, then
//! `UNITSCALC__*` environment variables (`__` separates nested keys).

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use unitscalc::{FormatOptions, Unit};

const DEFAULT_CONFIG_NAME: &str = "unitscalc";
const ENV_PREFIX: &str = "UNITSCALC";
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
// Largest scale a rust_decimal value can carry.
const MAX_FRACTION_DIGITS: u32 = 28;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target unit when none is given on the command line.
    pub default_unit: String,
    /// Number of results the REPL remembers.
    pub history_limit: usize,
    pub format: FormatConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub max_fraction_digits: u32,
    pub grouping: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_unit: "mm".into(),
            history_limit: 100,
            format: FormatConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        let options = FormatOptions::default();
        Self {
            max_fraction_digits: options.max_fraction_digits,
            grouping: options.grouping,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            json: false,
        }
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

impl Config {
    /// Load from `path` (required) or from `unitscalc.toml` if present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        Self::from_sources(file, environment())
    }

    fn from_sources<S>(file: S, env: config::Environment) -> anyhow::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()
            .context("Failed to read configuration sources")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> Result<(), String> {
        self.default_unit
            .parse::<Unit>()
            .map_err(|e| format!("default_unit: {e}"))?;

        if self.history_limit == 0 {
            return Err("history_limit must be at least 1".into());
        }

        if self.format.max_fraction_digits > MAX_FRACTION_DIGITS {
            return Err(format!(
                "format.max_fraction_digits must not exceed {MAX_FRACTION_DIGITS}"
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            ));
        }

        Ok(())
    }

    /// The configured default target; call `validate` first.
    pub fn target_unit(&self) -> anyhow::Result<Unit> {
        self.default_unit
            .parse::<Unit>()
            .context("Invalid default unit")
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            max_fraction_digits: self.format.max_fraction_digits,
            grouping: self.format.grouping,
        }
    }
}
