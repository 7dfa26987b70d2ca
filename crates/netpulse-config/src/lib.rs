//! Shared configuration for the netpulse CLI.
//!
//! A layered TOML file plus `NETPULSE_*` environment overrides, and the
//! translation from `[demo]` settings to a `netpulse_core::DemoGenerator`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netpulse_core::DemoGenerator;

/// Output formats the CLI knows how to render.
pub const OUTPUT_FORMATS: &[&str] = &["table", "json"];

/// Log levels accepted by `defaults.log_level`.
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    /// Synthetic dataset loaded at startup.
    #[serde(default)]
    pub demo: DemoSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    /// `table` or `json`.
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            log_level: default_log_level(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_log_level() -> String {
    "warn".into()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DemoSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_sites")]
    pub sites: usize,

    #[serde(default = "default_alarms")]
    pub alarms: usize,

    #[serde(default = "default_work_orders")]
    pub work_orders: usize,

    /// Hourly samples per KPI series.
    #[serde(default = "default_kpi_samples")]
    pub kpi_samples: usize,
}

impl Default for DemoSettings {
    fn default() -> Self {
        let generator = DemoGenerator::default();
        Self {
            enabled: true,
            seed: generator.seed,
            sites: generator.sites,
            alarms: generator.alarms,
            work_orders: generator.work_orders,
            kpi_samples: generator.kpi_samples,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_seed() -> u64 {
    DemoGenerator::default().seed
}
fn default_sites() -> usize {
    DemoGenerator::default().sites
}
fn default_alarms() -> usize {
    DemoGenerator::default().alarms
}
fn default_work_orders() -> usize {
    DemoGenerator::default().work_orders
}
fn default_kpi_samples() -> usize {
    DemoGenerator::default().kpi_samples
}

impl DemoSettings {
    /// Build the generator these settings describe.
    pub fn generator(&self) -> DemoGenerator {
        DemoGenerator {
            seed: self.seed,
            sites: self.sites,
            alarms: self.alarms,
            work_orders: self.work_orders,
            kpi_samples: self.kpi_samples,
            ..DemoGenerator::default()
        }
    }
}

// ── Validation ──────────────────────────────────────────────────────

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !OUTPUT_FORMATS.contains(&self.defaults.output.as_str()) {
            return Err(ConfigError::Validation {
                field: "defaults.output".into(),
                reason: format!(
                    "expected one of {}, got '{}'",
                    OUTPUT_FORMATS.join(", "),
                    self.defaults.output
                ),
            });
        }

        if !LOG_LEVELS.contains(&self.defaults.log_level.as_str()) {
            return Err(ConfigError::Validation {
                field: "defaults.log_level".into(),
                reason: format!(
                    "expected one of {}, got '{}'",
                    LOG_LEVELS.join(", "),
                    self.defaults.log_level
                ),
            });
        }

        if self.demo.enabled {
            let sizes = [
                ("demo.sites", self.demo.sites),
                ("demo.alarms", self.demo.alarms),
                ("demo.work_orders", self.demo.work_orders),
                ("demo.kpi_samples", self.demo.kpi_samples),
            ];
            if let Some((field, _)) = sizes.iter().find(|(_, n)| *n == 0) {
                return Err(ConfigError::Validation {
                    field: (*field).into(),
                    reason: "must be greater than zero while demo is enabled".into(),
                });
            }
        }

        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "netpulse", "netpulse").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netpulse");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// The provider chain: defaults, then the TOML file, then `NETPULSE_*`.
///
/// Nested keys use a double underscore, e.g. `NETPULSE_DEMO__SITES=10`.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETPULSE_").split("__"))
}

/// Load and validate the config from `path`, or the canonical location.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    let config: Config = figment(&path).extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if loading or validation fails.
pub fn load_config_or_default(path: Option<&Path>) -> Config {
    load_config(path).unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path` or the canonical
/// location. Returns the path written.
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(path)
}
