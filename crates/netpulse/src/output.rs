//! Output formatting: table or JSON.
//!
//! Table output uses `tabled`; JSON serializes the underlying view via serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use netpulse_core::AlarmStatus;
use netpulse_core::aggregate::MetricMean;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Severity label, colored by severity when enabled.
pub fn severity(status: AlarmStatus, color: bool) -> String {
    let label = status.to_string();
    if !color {
        return label;
    }
    match status {
        AlarmStatus::Critical => label.red().bold().to_string(),
        AlarmStatus::Major => label.yellow().to_string(),
        AlarmStatus::Minor => label.cyan().to_string(),
        AlarmStatus::Normal => label.green().to_string(),
    }
}

/// Section heading above a table.
pub fn heading(title: &str, color: bool) -> String {
    if color {
        title.bold().to_string()
    } else {
        title.to_owned()
    }
}

/// Mean formatted to two decimals.
pub fn fmt_mean(value: f64) -> String {
    format!("{value:.2}")
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a whole view: JSON serializes `data`, table output joins the
/// sections produced by `table_fn`.
pub fn render_view<T>(
    format: OutputFormat,
    data: &T,
    table_fn: impl Fn(&T) -> Vec<String>,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(table_fn(data)
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")),
        OutputFormat::Json => render_json(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: impl IntoIterator<Item = R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}

// ── Shared rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct MeanRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Mean")]
    mean: String,
}

impl From<&MetricMean> for MeanRow {
    fn from(m: &MetricMean) -> Self {
        Self {
            metric: m.metric,
            mean: fmt_mean(m.mean),
        }
    }
}
