//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use netpulse_config::ConfigError;
use netpulse_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const IMPORT: i32 = 3;
    pub const EXPORT: i32 = 4;
    pub const CONFIG: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Import / export ──────────────────────────────────────────────

    #[error("Could not import {path}: {reason}")]
    #[diagnostic(
        code(netpulse::import_failed),
        help(
            "Imports need a comma-delimited file with a header row and the\n\
             same number of fields on every line. Nothing was stored."
        )
    )]
    ImportFailed { path: String, reason: String },

    #[error("Unsupported file format: .{extension}")]
    #[diagnostic(
        code(netpulse::unsupported_format),
        help("Imports accept .csv, .txt, .xlsx and .xls; exports accept .csv, .txt and .xlsx.")
    )]
    UnsupportedFormat { extension: String },

    #[error("Export failed: {reason}")]
    #[diagnostic(code(netpulse::export_failed))]
    ExportFailed { reason: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netpulse::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(netpulse::config_exists),
        help("Pass --force to overwrite it, or edit the file directly.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(netpulse::config),
        help("Check the TOML syntax and NETPULSE_* environment variables.")
    )]
    Config(Box<figment::Error>),

    #[error("failed to serialize config: {0}")]
    #[diagnostic(code(netpulse::config))]
    ConfigSerialization(#[from] toml::ser::Error),

    // ── Internal ─────────────────────────────────────────────────────

    #[error("Internal error: {0}")]
    #[diagnostic(code(netpulse::internal))]
    Internal(String),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(netpulse::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ImportFailed { .. } | Self::UnsupportedFormat { .. } => exit_code::IMPORT,
            Self::ExportFailed { .. } => exit_code::EXPORT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::ConfigExists { .. } | Self::Config(_) | Self::ConfigSerialization(_) => {
                exit_code::CONFIG
            }
            Self::Internal(_) | Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }

    /// Attach the offending file to a core error raised while importing it.
    pub fn import(path: &std::path::Path, err: CoreError) -> Self {
        match err {
            CoreError::ImportParse { format, reason } => CliError::ImportFailed {
                path: path.display().to_string(),
                reason: format!("{format}: {reason}"),
            },
            other => other.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ImportParse { format, reason } => CliError::ImportFailed {
                path: format!("({format} input)"),
                reason,
            },

            CoreError::UnsupportedFormat { extension } => CliError::UnsupportedFormat { extension },

            CoreError::Export { reason } => CliError::ExportFailed { reason },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Serialization(e) => CliError::ConfigSerialization(e),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
