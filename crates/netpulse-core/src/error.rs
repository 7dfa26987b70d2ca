// ── Core error types ──
//
// Only whole-operation failures surface here. Per-field coercion problems
// are reported through `CoercionDiagnostics`, and lookups that miss are
// silent no-ops, so neither has a variant.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Import errors ────────────────────────────────────────────────
    /// The raw file could not be read as rows. Nothing was stored.
    #[error("Cannot parse {format} import: {reason}")]
    ImportParse { format: String, reason: String },

    #[error("Unsupported file format: .{extension}")]
    UnsupportedFormat { extension: String },

    // ── Export errors ────────────────────────────────────────────────
    #[error("Export failed: {reason}")]
    Export { reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rust_xlsxwriter::XlsxError> for CoreError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        CoreError::Export {
            reason: err.to_string(),
        }
    }
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        CoreError::ImportParse {
            format: "csv".into(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = CoreError::UnsupportedFormat {
            extension: "ods".into(),
        };
        assert_eq!(err.to_string(), "Unsupported file format: .ods");

        let err = CoreError::ImportParse {
            format: "txt".into(),
            reason: "CSV parse error: record 1 (line 2, byte: 10): invalid utf-8".into(),
        };
        assert!(err.to_string().starts_with("Cannot parse txt import"));
    }
}
