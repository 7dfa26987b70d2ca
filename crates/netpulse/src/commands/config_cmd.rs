//! Config subcommand handlers.

use std::path::Path;

use netpulse_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand, OutputFormat};
use crate::error::CliError;
use crate::output;

fn resolved_path(explicit: Option<&Path>) -> std::path::PathBuf {
    explicit.map_or_else(config::config_path, Path::to_path_buf)
}

pub fn handle(
    args: &ConfigArgs,
    path: Option<&Path>,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config(path)?;
            let out = match format {
                OutputFormat::Table => toml::to_string_pretty(&cfg)?,
                OutputFormat::Json => output::render_json(&cfg)?,
            };
            output::print_output(out.trim_end(), quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let target = resolved_path(path);
            if target.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: target.display().to_string(),
                });
            }
            let written = config::save_config(&Config::default(), Some(&target))?;
            tracing::info!(path = %written.display(), "config written");
            if !quiet {
                eprintln!("Config written to {}", written.display());
            }
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&resolved_path(path).display().to_string(), quiet);
            Ok(())
        }
    }
}
