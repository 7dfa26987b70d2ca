//! Command dispatch: routes each subcommand to its handler.

pub mod alarms;
pub mod config_cmd;
pub mod kpi;
pub mod noc;
pub mod util;
pub mod work_orders;

use netpulse_core::Engine;

use crate::cli::{Command, OutputFormat};
use crate::error::CliError;

/// Rendering settings resolved from flags and config.
#[derive(Debug, Clone)]
pub struct RenderCtx {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

/// Dispatch a dashboard command against a populated engine.
pub fn dispatch(cmd: Command, engine: &Engine, ctx: &RenderCtx) -> Result<(), CliError> {
    match cmd {
        Command::Noc(args) => noc::handle(&args, engine, ctx),
        Command::Alarms(args) => alarms::handle(&args, engine, ctx),
        Command::WorkOrders(args) => work_orders::handle(&args, engine, ctx),
        Command::Kpi(args) => kpi::handle(&args, engine, ctx),
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before the engine is built".into(),
        )),
    }
}
