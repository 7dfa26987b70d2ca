//! Telemetry normalization and aggregation engine behind the `netpulse` CLI.
//!
//! This crate owns the domain model, import pipeline and reactive storage
//! for multi-vendor network monitoring data:
//!
//! - **[`Engine`]**: Facade over a shared [`DataStore`]. Every write
//!   (imports, dataset loads, acknowledgment toggles) is a [`Command`]
//!   routed through [`Engine::execute`].
//!
//! - **Normalizer** ([`normalize`]): Turns loosely-typed rows into
//!   canonical entities through one coercion table per kind. Coercion is
//!   total: bad or missing values fall back to defaults and are counted in
//!   [`CoercionDiagnostics`].
//!
//! - **[`DataStore`]**: Ordered collections held in `tokio::sync::watch`
//!   channels. Alarms and work orders are prepended, network records
//!   appended, KPI series replaced. Each mutation is applied atomically.
//!
//! - **[`LiveView`]**: A filter or dashboard projection that follows one
//!   collection and re-derives itself on every change.
//!
//! - **Projections** ([`filter`], [`aggregate`], [`view`]): Pure,
//!   order-preserving facet filters and fixed-domain grouping with
//!   empty-safe means.
//!
//! - **Tabular I/O** ([`tabular`]): CSV/TXT/XLSX/XLS parsing and CSV/XLSX
//!   export in canonical column order.

pub mod aggregate;
pub mod command;
pub mod convert;
pub mod error;
pub mod filter;
pub mod generator;
pub mod live;
pub mod model;
pub mod normalize;
pub mod store;
pub mod tabular;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult, Engine};
pub use error::CoreError;
pub use filter::{AckFilter, FacetFilter, Selection};
pub use generator::{Dataset, DemoGenerator, Generator};
pub use live::LiveView;
pub use normalize::{CoercionDiagnostics, Normalized, Row, Schema};
pub use store::DataStore;
pub use tabular::RowFormat;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Alarm, AlarmStatus, EntityId, EntityKind, Facet, Faceted, Identified, Kpi2gSample,
    Kpi3gSample, Kpi4gSample, NetworkRecord, Placement, Priority, Region, Team, Technology,
    TicketStatus, Vendor, WorkOrder,
};
