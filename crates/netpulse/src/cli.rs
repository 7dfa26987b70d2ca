//! Clap derive structures for the `netpulse` CLI.
//!
//! Defines the command tree, global flags, and the shared filter flags.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};

use netpulse_core::{
    AckFilter, AlarmStatus, EntityKind, FacetFilter, Priority, Region, Selection, Team,
    Technology, TicketStatus, Vendor,
};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netpulse -- NOC dashboard for multi-vendor network telemetry
#[derive(Debug, Parser)]
#[command(
    name = "netpulse",
    version,
    about = "Inspect network, alarm, work-order and KPI telemetry from the command line",
    long_about = "Imports CSV/TXT/XLSX/XLS exports from Ericsson, Huawei and Nokia equipment,\n\
        normalizes them into one model, and renders filtered dashboard views.\n\n\
        A seeded demo dataset is loaded unless --no-demo is given.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "NETPULSE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (overrides `defaults.output`)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Log line format on stderr
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Start from an empty store instead of the demo dataset
    #[arg(long, global = true)]
    pub no_demo: bool,

    /// Import a file before running the command, e.g. `alarm=alarms.csv`
    #[arg(long, value_name = "KIND=FILE", global = true)]
    pub import: Vec<ImportSpec>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty tables (default)
    Table,
    /// Pretty-printed JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

// ── Import spec ──────────────────────────────────────────────────────

/// `KIND=FILE` pair given to `--import`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub kind: EntityKind,
    pub path: PathBuf,
}

impl FromStr for ImportSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, path) = s
            .split_once('=')
            .ok_or_else(|| format!("expected KIND=FILE, got '{s}'"))?;
        let kind = kind.parse::<EntityKind>().map_err(|_| {
            format!(
                "unknown kind '{kind}'; expected one of: network-record, alarm, work-order, \
                 kpi-2g, kpi-3g, kpi-4g"
            )
        })?;
        if path.is_empty() {
            return Err("missing file path after '='".into());
        }
        Ok(Self {
            kind,
            path: PathBuf::from(path),
        })
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Network operations overview: summary and per-facet groups
    Noc(NocArgs),

    /// Alarm list with severity counts and acknowledgment toggles
    #[command(alias = "al")]
    Alarms(AlarmsArgs),

    /// Work orders with team and status counts
    #[command(alias = "wo")]
    WorkOrders(WorkOrdersArgs),

    /// Headline KPI means for one radio generation
    Kpi(KpiArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared filter flags ──────────────────────────────────────────────

#[derive(Debug, Clone, Args)]
pub struct SiteFilterArgs {
    /// Vendor: All, Ericsson, Huawei or Nokia
    #[arg(long, default_value = "All")]
    pub vendor: Selection<Vendor>,

    /// Technology: All, 2G, 3G or 4G
    #[arg(long, default_value = "All")]
    pub technology: Selection<Technology>,

    /// Region: All, North, South, East, West or Central
    #[arg(long, default_value = "All")]
    pub region: Selection<Region>,
}

impl SiteFilterArgs {
    pub fn to_filter(&self) -> FacetFilter {
        FacetFilter {
            vendor: self.vendor,
            technology: self.technology,
            region: self.region,
            ..FacetFilter::all()
        }
    }
}

// ── NOC ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NocArgs {
    #[command(flatten)]
    pub filter: SiteFilterArgs,

    /// List every matching site below the summary
    #[arg(long)]
    pub sites: bool,

    /// Write the matching sites to a CSV/TXT/XLSX file
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

// ── Alarms ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AlarmsArgs {
    #[command(flatten)]
    pub filter: SiteFilterArgs,

    /// Severity: All, Critical, Major, Minor or Normal
    #[arg(long, default_value = "All")]
    pub status: Selection<AlarmStatus>,

    /// Acknowledgment state
    #[arg(long, default_value = "all", value_parser = parse_ack)]
    pub ack: AckFilter,

    /// Flip the acknowledged flag of an alarm (repeatable)
    #[arg(long, value_name = "ID")]
    pub toggle: Vec<String>,

    /// List most severe first instead of newest first
    #[arg(long)]
    pub by_severity: bool,

    /// Write the listed alarms to a CSV/TXT/XLSX file
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

fn parse_ack(s: &str) -> Result<AckFilter, String> {
    s.parse()
        .map_err(|_| format!("expected all, acknowledged or unacknowledged, got '{s}'"))
}

impl AlarmsArgs {
    pub fn to_filter(&self) -> FacetFilter {
        FacetFilter {
            alarm_status: self.status,
            acknowledged: self.ack,
            ..self.filter.to_filter()
        }
    }
}

// ── Work orders ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WorkOrdersArgs {
    #[command(flatten)]
    pub filter: SiteFilterArgs,

    /// Ticket status: All, Open, "In Progress", Resolved or Closed
    #[arg(long, default_value = "All")]
    pub status: Selection<TicketStatus>,

    /// Team: All, R&D, Transmission or Core
    #[arg(long, default_value = "All")]
    pub team: Selection<Team>,

    /// Priority: All, High, Medium or Low
    #[arg(long, default_value = "All")]
    pub priority: Selection<Priority>,

    /// Write the listed work orders to a CSV/TXT/XLSX file
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

impl WorkOrdersArgs {
    pub fn to_filter(&self) -> FacetFilter {
        FacetFilter {
            ticket_status: self.status,
            team: self.team,
            priority: self.priority,
            ..self.filter.to_filter()
        }
    }
}

// ── KPI ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct KpiArgs {
    /// Radio generation
    pub generation: Generation,

    /// Write the full sample series to a CSV/TXT/XLSX file
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Generation {
    #[value(name = "2g")]
    G2,
    #[value(name = "3g")]
    G3,
    #[value(name = "4g")]
    G4,
}

impl Generation {
    pub fn technology(self) -> Technology {
        match self {
            Self::G2 => Technology::Gsm,
            Self::G3 => Technology::Umts,
            Self::G4 => Technology::Lte,
        }
    }

    pub fn kind(self) -> EntityKind {
        match self {
            Self::G2 => EntityKind::Kpi2g,
            Self::G3 => EntityKind::Kpi3g,
            Self::G4 => EntityKind::Kpi4g,
        }
    }
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    pub shell: clap_complete::Shell,
}
