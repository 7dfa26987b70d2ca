// ── Field coercion rules ──
//
// One `Rule` per canonical field. Coercion is total: every rule produces a
// value for every input, falling back to a default when the raw value is
// absent or unusable. Nothing in here returns an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::model::{EntityId, Facet};

/// Naive layouts accepted in addition to RFC 3339, read as UTC.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// A bare calendar date, read as midnight UTC.
const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Inclusive numeric range a coerced number must fall in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const ANY: Self = Self {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };
    pub const NON_NEGATIVE: Self = Self {
        min: 0.0,
        max: f64::INFINITY,
    };
    pub const PERCENT: Self = Self {
        min: 0.0,
        max: 100.0,
    };

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// Default for a missing text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFallback {
    /// A fixed literal.
    Literal(&'static str),
    /// `Site-{row index}`.
    SiteName,
    /// `TKT-{unix millis}-{row index}`.
    TicketNumber,
}

/// How a single canonical field is coerced from a raw value.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Kept verbatim when present, otherwise synthesized with this prefix.
    Identity { prefix: &'static str },
    Text { fallback: TextFallback },
    Number { fallback: f64, bounds: Bounds },
    /// Exact facet literal, otherwise the facet's fallback member.
    Facet {
        recognize: fn(&str) -> Option<&'static str>,
        fallback: fn() -> &'static str,
    },
    /// Only `true` or `"true"` is true.
    Flag,
    /// RFC 3339 instant, naive date-time or bare date, otherwise the
    /// import's "now".
    Timestamp,
}

impl Rule {
    pub const fn facet<F: Facet>() -> Self {
        Self::Facet {
            recognize: recognize_literal::<F>,
            fallback: fallback_literal::<F>,
        }
    }

    pub const fn number(fallback: f64, bounds: Bounds) -> Self {
        Self::Number { fallback, bounds }
    }

    pub const fn text(fallback: &'static str) -> Self {
        Self::Text {
            fallback: TextFallback::Literal(fallback),
        }
    }
}

fn recognize_literal<F: Facet>(raw: &str) -> Option<&'static str> {
    F::parse_literal(raw).map(Facet::literal)
}

fn fallback_literal<F: Facet>() -> &'static str {
    F::FALLBACK.literal()
}

/// A named canonical field and its coercion rule.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
}

impl FieldRule {
    pub const fn new(field: &'static str, rule: Rule) -> Self {
        Self { field, rule }
    }
}

/// A coerced, fully-typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Id(EntityId),
    Text(String),
    Number(f64),
    Literal(&'static str),
    Flag(bool),
    Timestamp(DateTime<Utc>),
}

impl Coerced {
    /// Render as a flat cell for tabular export.
    pub fn to_cell(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Literal(l) => (*l).to_owned(),
            Self::Flag(b) => b.to_string(),
            Self::Timestamp(ts) => format_timestamp(ts),
        }
    }

    /// Render as an untyped value, the inverse of coercion.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Id(id) => Value::String(id.to_string()),
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
            Self::Literal(l) => Value::String((*l).to_owned()),
            Self::Flag(b) => Value::Bool(*b),
            Self::Timestamp(ts) => Value::String(format_timestamp(ts)),
        }
    }
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Per-import values shared by every row.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ImportClock {
    pub now: DateTime<Utc>,
}

/// Result of coercing one field.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Outcome {
    pub value: Coerced,
    /// The default was substituted.
    pub fallback: bool,
    /// A value was present but could not be used.
    pub unrecognized: bool,
}

impl Outcome {
    fn accepted(value: Coerced) -> Self {
        Self {
            value,
            fallback: false,
            unrecognized: false,
        }
    }

    fn absent(value: Coerced) -> Self {
        Self {
            value,
            fallback: true,
            unrecognized: false,
        }
    }

    fn rejected(value: Coerced) -> Self {
        Self {
            value,
            fallback: true,
            unrecognized: true,
        }
    }
}

/// Treat `null` and the empty string the same as a missing key.
fn present(raw: Option<&Value>) -> Option<&Value> {
    match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        other => other,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_ONLY_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

impl Rule {
    /// Coerce one raw value. Never fails.
    pub(crate) fn coerce(&self, raw: Option<&Value>, index: usize, clock: ImportClock) -> Outcome {
        let raw = present(raw);
        match *self {
            Self::Identity { prefix } => match raw.and_then(scalar_text) {
                Some(id) => Outcome::accepted(Coerced::Id(EntityId::from(id))),
                None => Outcome::absent(Coerced::Id(EntityId::synthesize(prefix))),
            },

            Self::Text { fallback } => match raw.and_then(scalar_text) {
                Some(text) => Outcome::accepted(Coerced::Text(text)),
                None => {
                    let text = match fallback {
                        TextFallback::Literal(lit) => lit.to_owned(),
                        TextFallback::SiteName => format!("Site-{index}"),
                        TextFallback::TicketNumber => {
                            format!("TKT-{}-{index}", clock.now.timestamp_millis())
                        }
                    };
                    Outcome::absent(Coerced::Text(text))
                }
            },

            Self::Number { fallback, bounds } => match raw {
                None => Outcome::absent(Coerced::Number(fallback)),
                Some(value) => match parse_number(value) {
                    Some(n) if bounds.contains(n) => Outcome::accepted(Coerced::Number(n)),
                    _ => Outcome::rejected(Coerced::Number(fallback)),
                },
            },

            Self::Facet {
                recognize,
                fallback,
            } => match raw {
                None => Outcome::absent(Coerced::Literal(fallback())),
                Some(value) => match value.as_str().and_then(recognize) {
                    Some(literal) => Outcome::accepted(Coerced::Literal(literal)),
                    None => Outcome::rejected(Coerced::Literal(fallback())),
                },
            },

            Self::Flag => match raw {
                None => Outcome::absent(Coerced::Flag(false)),
                Some(Value::Bool(b)) => Outcome::accepted(Coerced::Flag(*b)),
                Some(Value::String(s)) => Outcome::accepted(Coerced::Flag(s == "true")),
                Some(_) => Outcome::accepted(Coerced::Flag(false)),
            },

            Self::Timestamp => match raw {
                None => Outcome::absent(Coerced::Timestamp(clock.now)),
                Some(value) => match value.as_str().and_then(parse_timestamp) {
                    Some(ts) => Outcome::accepted(Coerced::Timestamp(ts)),
                    None => Outcome::rejected(Coerced::Timestamp(clock.now)),
                },
            },
        }
    }
}
