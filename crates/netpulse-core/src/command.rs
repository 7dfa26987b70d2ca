// ── Command API ──
//
// Every write to the store flows through a `Command`. The `Engine` routes
// each variant to the matching store operation and reports what changed.
// Reads bypass commands and go straight to snapshots or views.

use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreError;
use crate::generator::{Dataset, Generator};
use crate::model::{Alarm, EntityId, EntityKind};
use crate::normalize::{CoercionDiagnostics, Row};
use crate::store::DataStore;
use crate::tabular::{self, RowFormat};

/// All possible write operations against the store.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Imports ──────────────────────────────────────────────────────
    /// Normalize already-parsed rows.
    Import { kind: EntityKind, rows: Vec<Row> },
    /// Parse a raw file, then normalize. A parse failure stores nothing.
    ImportFile {
        kind: EntityKind,
        format: RowFormat,
        bytes: Vec<u8>,
    },
    /// Load canonical entities, e.g. from a generator.
    Load(Dataset),

    // ── Mutations ────────────────────────────────────────────────────
    ToggleAcknowledged { id: EntityId },
}

/// Outcome of a successfully executed command.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandResult {
    Imported {
        kind: EntityKind,
        diagnostics: CoercionDiagnostics,
    },
    Loaded {
        total: usize,
    },
    Alarms {
        alarms: Arc<Vec<Arc<Alarm>>>,
    },
}

/// Facade owning the shared store.
///
/// Cheap to clone; every clone sees the same store.
#[derive(Clone, Default)]
pub struct Engine {
    store: Arc<DataStore>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose store starts with the generator's dataset.
    pub fn seeded(generator: &impl Generator) -> Self {
        let engine = Self::new();
        engine.store.load(generator.generate());
        engine
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    pub fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        match cmd {
            Command::Import { kind, rows } => Ok(CommandResult::Imported {
                kind,
                diagnostics: self.store.import(kind, &rows),
            }),

            Command::ImportFile {
                kind,
                format,
                bytes,
            } => {
                let rows = tabular::parse_rows(&bytes, format).inspect_err(|e| {
                    tracing::warn!(%kind, %format, error = %e, "import rejected");
                })?;
                Ok(CommandResult::Imported {
                    kind,
                    diagnostics: self.store.import(kind, &rows),
                })
            }

            Command::Load(dataset) => {
                let total = dataset.network_records.len()
                    + dataset.alarms.len()
                    + dataset.work_orders.len()
                    + dataset.kpi_2g.len()
                    + dataset.kpi_3g.len()
                    + dataset.kpi_4g.len();
                self.store.load(dataset);
                Ok(CommandResult::Loaded { total })
            }

            Command::ToggleAcknowledged { id } => Ok(CommandResult::Alarms {
                alarms: self.store.toggle_acknowledged(&id),
            }),
        }
    }

    /// Render one collection as file bytes in a tabular format.
    pub fn export(&self, kind: EntityKind, format: RowFormat) -> Result<Vec<u8>, CoreError> {
        let store = &self.store;
        match kind {
            EntityKind::NetworkRecord => tabular::export(&store.network_records_snapshot(), format),
            EntityKind::Alarm => tabular::export(&store.alarms_snapshot(), format),
            EntityKind::WorkOrder => tabular::export(&store.work_orders_snapshot(), format),
            EntityKind::Kpi2g => tabular::export(&store.kpi_2g_snapshot(), format),
            EntityKind::Kpi3g => tabular::export(&store.kpi_3g_snapshot(), format),
            EntityKind::Kpi4g => tabular::export(&store.kpi_4g_snapshot(), format),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::generator::DemoGenerator;

    #[test]
    fn import_file_reports_diagnostics() {
        let engine = Engine::new();
        let result = engine
            .execute(Command::ImportFile {
                kind: EntityKind::Alarm,
                format: RowFormat::Csv,
                bytes: b"id,status,region\nA-1,Critical,Nowhere\n".to_vec(),
            })
            .unwrap();
        let CommandResult::Imported { kind, diagnostics } = result else {
            panic!("expected an import result");
        };
        assert_eq!(kind, EntityKind::Alarm);
        assert_eq!(diagnostics.unrecognized_for("region"), 1);
        assert_eq!(engine.store().count(EntityKind::Alarm), 1);
    }

    #[test]
    fn failed_parse_leaves_store_untouched() {
        let engine = Engine::seeded(&DemoGenerator::default());
        let before = engine.store().alarms_snapshot();
        let version = engine.store().version(EntityKind::Alarm);

        let err = engine
            .execute(Command::ImportFile {
                kind: EntityKind::Alarm,
                format: RowFormat::Csv,
                bytes: b"id,status\nA-1\nA-2,Major,extra\n".to_vec(),
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::ImportParse { .. }));
        assert!(Arc::ptr_eq(&before, &engine.store().alarms_snapshot()));
        assert_eq!(engine.store().version(EntityKind::Alarm), version);
    }

    #[test]
    fn unsupported_format_is_reported() {
        let engine = Engine::new();
        let err = engine
            .execute(Command::ImportFile {
                kind: EntityKind::WorkOrder,
                format: RowFormat::Xls,
                bytes: Vec::new(),
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFormat { .. }));
    }

    #[test]
    fn toggle_returns_alarm_snapshot() {
        let engine = Engine::seeded(&DemoGenerator::default());
        let first = engine.store().alarms_snapshot()[0].clone();
        let result = engine
            .execute(Command::ToggleAcknowledged {
                id: first.id.clone(),
            })
            .unwrap();
        let CommandResult::Alarms { alarms } = result else {
            panic!("expected alarms");
        };
        assert_eq!(alarms[0].acknowledged, !first.acknowledged);
    }

    #[test]
    fn load_counts_every_entity() {
        let engine = Engine::new();
        let result = engine
            .execute(Command::Load(DemoGenerator::default().generate()))
            .unwrap();
        let CommandResult::Loaded { total } = result else {
            panic!("expected load result");
        };
        assert_eq!(total, 60 + 40 + 30 + 24 * 3);
        assert!(engine.store().last_import().is_some());
    }

    #[test]
    fn export_renders_selected_collection() {
        let engine = Engine::seeded(&DemoGenerator::default());
        let csv = engine.export(EntityKind::WorkOrder, RowFormat::Csv).unwrap();
        let csv = String::from_utf8(csv).unwrap();
        assert!(csv.starts_with("id,ticketNumber,description,status,team,"));
        assert_eq!(csv.lines().count(), 31);

        let workbook = engine.export(EntityKind::Alarm, RowFormat::Xlsx).unwrap();
        let rows = tabular::parse_rows(&workbook, RowFormat::Xlsx).unwrap();
        assert_eq!(rows.len(), 40);
        assert!(engine.export(EntityKind::Alarm, RowFormat::Xls).is_err());
    }

    #[test]
    fn clones_share_one_store() {
        let engine = Engine::new();
        let other = engine.clone();
        other
            .execute(Command::Import {
                kind: EntityKind::NetworkRecord,
                rows: vec![Row::new()],
            })
            .unwrap();
        assert_eq!(engine.store().count(EntityKind::NetworkRecord), 1);
    }
}
