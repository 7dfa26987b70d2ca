// ── Schema normalizer ──
//
// Turns loosely-typed row mappings into canonical entities by running each
// row through the target kind's coercion table. Output length and order
// always match the input; coercion never fails. The normalizer does not
// touch the store.

mod rules;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::model::{EntityId, EntityKind, Facet};

pub use rules::{Bounds, Coerced, FieldRule, Rule, TextFallback};
pub(crate) use rules::{ImportClock, format_timestamp};

/// A raw imported row: field name to untyped value.
pub type Row = serde_json::Map<String, Value>;

/// An entity kind that can be built from, and flattened back into, a row.
///
/// `FIELDS` is the coercion table and also the canonical column order used
/// when the kind is exported.
pub trait Schema: Sized + Clone + Send + Sync + 'static {
    const KIND: EntityKind;
    const FIELDS: &'static [FieldRule];

    /// Build the entity from a row already coerced through `FIELDS`.
    fn assemble(row: &mut CoercedRow) -> Self;

    /// Flatten the entity into coerced values keyed by field name.
    fn to_row(&self) -> CoercedRow;

    /// Flatten into an untyped row, suitable for re-import.
    fn to_raw_row(&self) -> Row {
        let coerced = self.to_row();
        Self::FIELDS
            .iter()
            .filter_map(|f| {
                coerced
                    .get(f.field)
                    .map(|v| (f.field.to_owned(), v.to_value()))
            })
            .collect()
    }
}

// ── Coerced row ─────────────────────────────────────────────────────

/// Fully-typed field values for one row, keyed by canonical field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoercedRow {
    values: Vec<(&'static str, Coerced)>,
}

impl CoercedRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &'static str, value: Coerced) -> Self {
        self.values.push((field, value));
        self
    }

    pub fn get(&self, field: &str) -> Option<&Coerced> {
        self.values.iter().find(|(f, _)| *f == field).map(|(_, v)| v)
    }

    fn take(&mut self, field: &str) -> Option<Coerced> {
        let pos = self.values.iter().position(|(f, _)| *f == field)?;
        Some(self.values.swap_remove(pos).1)
    }

    pub fn id(&mut self, field: &str) -> EntityId {
        match self.take(field) {
            Some(Coerced::Id(id)) => id,
            Some(other) => EntityId::from(other.to_cell()),
            None => EntityId::default(),
        }
    }

    pub fn text(&mut self, field: &str) -> String {
        self.take(field).map(|v| v.to_cell()).unwrap_or_default()
    }

    pub fn number(&mut self, field: &str) -> f64 {
        match self.take(field) {
            Some(Coerced::Number(n)) => n,
            _ => 0.0,
        }
    }

    pub fn facet<F: Facet>(&mut self, field: &str) -> F {
        match self.take(field) {
            Some(Coerced::Literal(lit)) => F::parse_literal(lit).unwrap_or(F::FALLBACK),
            _ => F::FALLBACK,
        }
    }

    pub fn flag(&mut self, field: &str) -> bool {
        matches!(self.take(field), Some(Coerced::Flag(true)))
    }

    pub fn timestamp(&mut self, field: &str) -> DateTime<Utc> {
        match self.take(field) {
            Some(Coerced::Timestamp(ts)) => ts,
            _ => DateTime::UNIX_EPOCH,
        }
    }
}

// ── Diagnostics ─────────────────────────────────────────────────────

/// Non-fatal record of every default substituted during one import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoercionDiagnostics {
    pub rows: usize,
    /// Substituted defaults per field (absent or unusable values).
    pub fallbacks: BTreeMap<&'static str, usize>,
    /// Of those, values that were present but not usable.
    pub unrecognized: BTreeMap<&'static str, usize>,
}

impl CoercionDiagnostics {
    pub fn total_fallbacks(&self) -> usize {
        self.fallbacks.values().sum()
    }

    pub fn total_unrecognized(&self) -> usize {
        self.unrecognized.values().sum()
    }

    pub fn fallbacks_for(&self, field: &str) -> usize {
        self.fallbacks.get(field).copied().unwrap_or(0)
    }

    pub fn unrecognized_for(&self, field: &str) -> usize {
        self.unrecognized.get(field).copied().unwrap_or(0)
    }

    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// Entities produced by one import, plus what was defaulted on the way.
#[derive(Debug, Clone)]
pub struct Normalized<T> {
    pub entities: Vec<T>,
    pub diagnostics: CoercionDiagnostics,
}

// ── Entry points ────────────────────────────────────────────────────

/// Normalize rows into canonical entities, using the current instant for
/// missing timestamps.
pub fn normalize<T: Schema>(rows: &[Row]) -> Normalized<T> {
    normalize_at(rows, Utc::now())
}

/// Normalize rows with an explicit "now" for missing or bad timestamps.
pub fn normalize_at<T: Schema>(rows: &[Row], now: DateTime<Utc>) -> Normalized<T> {
    let clock = ImportClock { now };
    let mut diagnostics = CoercionDiagnostics {
        rows: rows.len(),
        ..CoercionDiagnostics::default()
    };

    let entities = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut coerced = CoercedRow::new();
            for field in T::FIELDS {
                let outcome = field.rule.coerce(row.get(field.field), index, clock);
                if outcome.fallback {
                    *diagnostics.fallbacks.entry(field.field).or_default() += 1;
                }
                if outcome.unrecognized {
                    *diagnostics.unrecognized.entry(field.field).or_default() += 1;
                }
                coerced.values.push((field.field, outcome.value));
            }
            T::assemble(&mut coerced)
        })
        .collect();

    if !diagnostics.is_clean() {
        tracing::debug!(
            kind = %T::KIND,
            rows = diagnostics.rows,
            fallbacks = diagnostics.total_fallbacks(),
            "substituted defaults during import"
        );
    }
    for (field, count) in &diagnostics.unrecognized {
        tracing::warn!(
            kind = %T::KIND,
            field,
            count,
            "unrecognized values replaced with defaults"
        );
    }

    Normalized {
        entities,
        diagnostics,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::model::Alarm;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn output_matches_input_length_and_order() {
        let rows = vec![
            row(json!({"id": "a", "status": "Critical"})),
            row(json!({"id": "b", "status": "Major"})),
            row(json!({})),
        ];
        let out = normalize::<Alarm>(&rows);
        assert_eq!(out.entities.len(), 3);
        assert_eq!(out.entities[0].id.as_str(), "a");
        assert_eq!(out.entities[1].id.as_str(), "b");
        assert_eq!(out.diagnostics.rows, 3);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let out = normalize::<Alarm>(&[]);
        assert!(out.entities.is_empty());
        assert!(out.diagnostics.is_clean());
    }

    #[test]
    fn diagnostics_count_fallbacks_per_field() {
        let rows = vec![
            row(json!({"id": "a", "vendor": "huawei", "region": "North"})),
            row(json!({"id": "b", "vendor": "Nokia"})),
        ];
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let out = normalize_at::<Alarm>(&rows, now);

        assert_eq!(out.diagnostics.fallbacks_for("vendor"), 1);
        assert_eq!(out.diagnostics.unrecognized_for("vendor"), 1);
        assert_eq!(out.diagnostics.fallbacks_for("region"), 1);
        assert_eq!(out.diagnostics.unrecognized_for("region"), 0);
        assert_eq!(out.diagnostics.fallbacks_for("id"), 0);
        assert_eq!(out.diagnostics.fallbacks_for("timestamp"), 2);
        assert!(out.entities.iter().all(|a| a.timestamp == now));
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let rows = vec![row(json!({"id": "x", "colour": "blue", "STATUS": "Critical"}))];
        let out = normalize::<Alarm>(&rows);
        assert_eq!(out.entities[0].status, crate::model::AlarmStatus::Minor);
    }

    #[test]
    fn coerced_row_getters_tolerate_missing_fields() {
        let mut empty = CoercedRow::new();
        assert_eq!(empty.number("x"), 0.0);
        assert!(!empty.flag("x"));
        assert_eq!(empty.text("x"), "");
        assert_eq!(empty.facet::<crate::model::Region>("x"), crate::model::Region::Central);
    }
}
