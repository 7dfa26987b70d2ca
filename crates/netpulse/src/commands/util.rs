//! Shared helpers for command handlers.

use std::path::Path;
use std::sync::Arc;

use netpulse_core::tabular;
use netpulse_core::{
    CoercionDiagnostics, Command as CoreCommand, CommandResult, Engine, EntityKind, RowFormat,
    Schema,
};

use crate::cli::ImportSpec;
use crate::error::CliError;

/// Write `items` to `path` in the format its extension names.
pub fn export_to<T: Schema>(path: &Path, items: &[Arc<T>], quiet: bool) -> Result<(), CliError> {
    let format = RowFormat::from_path(path)?;
    let body = tabular::export(items, format)?;
    std::fs::write(path, body)?;
    tracing::info!(kind = %T::KIND, count = items.len(), path = %path.display(), "exported");
    if !quiet {
        eprintln!("Exported {} {} to {}", items.len(), T::KIND, path.display());
    }
    Ok(())
}

/// Read and import one `--import` file.
pub fn import_file(engine: &Engine, spec: &ImportSpec, quiet: bool) -> Result<(), CliError> {
    let format = RowFormat::from_path(&spec.path).map_err(|e| CliError::import(&spec.path, e))?;
    let bytes = std::fs::read(&spec.path)?;
    let result = engine
        .execute(CoreCommand::ImportFile {
            kind: spec.kind,
            format,
            bytes,
        })
        .map_err(|e| CliError::import(&spec.path, e))?;

    if let CommandResult::Imported { kind, diagnostics } = result {
        if !quiet {
            eprintln!("{}", describe_import(kind, &spec.path, &diagnostics));
        }
    }
    Ok(())
}

fn describe_import(
    kind: EntityKind,
    path: &Path,
    diagnostics: &CoercionDiagnostics,
) -> String {
    let mut line = format!(
        "Imported {} {kind} row(s) from {}",
        diagnostics.rows,
        path.display()
    );
    if !diagnostics.is_clean() {
        line.push_str(&format!(
            " ({} value(s) defaulted, {} unrecognized)",
            diagnostics.total_fallbacks(),
            diagnostics.total_unrecognized()
        ));
    }
    line
}
