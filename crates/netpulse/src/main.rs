mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use netpulse_config::{Config, ConfigError};
use netpulse_core::Engine;

use crate::cli::{Cli, Command, GlobalOpts, LogFormat, OutputFormat};
use crate::commands::RenderCtx;
use crate::error::CliError;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // The config may set the default log level, so it loads first
    let loaded = netpulse_config::load_config(cli.global.config.as_deref());
    let level = loaded
        .as_ref()
        .map_or_else(|_| "warn".to_owned(), |c| c.defaults.log_level.clone());
    init_tracing(cli.global.verbose, &level, cli.global.log_format);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli, loaded) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, configured: &str, format: LogFormat) {
    let filter = match verbosity {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn run(cli: Cli, loaded: Result<Config, ConfigError>) -> Result<(), CliError> {
    let Cli { global, command } = cli;

    match command {
        // Config commands report their own load errors
        Command::Config(args) => {
            let format = global.output.unwrap_or_else(|| {
                loaded
                    .as_ref()
                    .ok()
                    .and_then(|c| c.defaults.output.parse().ok())
                    .unwrap_or(OutputFormat::Table)
            });
            commands::config_cmd::handle(&args, global.config.as_deref(), format, global.quiet)
        }

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "netpulse", &mut std::io::stdout());
            Ok(())
        }

        // Dashboard commands need a populated engine
        cmd => {
            let cfg = loaded?;
            let ctx = RenderCtx {
                format: global.output.unwrap_or_else(|| {
                    cfg.defaults.output.parse().unwrap_or(OutputFormat::Table)
                }),
                color: output::should_color(global.color),
                quiet: global.quiet,
            };
            let engine = build_engine(&global, &cfg)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &engine, &ctx)
        }
    }
}

/// Seed the engine from config unless `--no-demo`, then apply `--import`
/// files in the order given.
fn build_engine(global: &GlobalOpts, cfg: &Config) -> Result<Engine, CliError> {
    let engine = if cfg.demo.enabled && !global.no_demo {
        Engine::seeded(&cfg.demo.generator())
    } else {
        Engine::new()
    };

    for spec in &global.import {
        commands::util::import_file(&engine, spec, global.quiet)?;
    }

    Ok(engine)
}
