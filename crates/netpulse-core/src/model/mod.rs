// ── Canonical domain model ──
//
// Every type in this module is the fully-typed, defaulted form of a
// telemetry record. Raw imported rows are converted into these by the
// normalizer; presentation layers only ever see these types.

pub mod alarm;
pub mod entity_id;
pub mod facet;
pub mod kpi;
pub mod network;
pub mod work_order;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use netpulse_core::model::*` gives you everything.

pub use alarm::Alarm;
pub use entity_id::EntityId;
pub use facet::{
    AlarmStatus, Facet, Faceted, Priority, Region, Team, Technology, TicketStatus, Vendor,
};
pub use kpi::{Kpi2gSample, Kpi3gSample, Kpi4gSample};
pub use network::NetworkRecord;
pub use work_order::WorkOrder;

/// Entities addressable by identity.
pub trait Identified {
    fn id(&self) -> &EntityId;
}

/// The entity kinds the engine knows how to normalize, store and export.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EntityKind {
    NetworkRecord,
    Alarm,
    WorkOrder,
    #[strum(serialize = "kpi-2g")]
    #[serde(rename = "kpi-2g")]
    Kpi2g,
    #[strum(serialize = "kpi-3g")]
    #[serde(rename = "kpi-3g")]
    Kpi3g,
    #[strum(serialize = "kpi-4g")]
    #[serde(rename = "kpi-4g")]
    Kpi4g,
}

impl EntityKind {
    /// How an import of this kind lands in the store.
    pub fn placement(self) -> Placement {
        match self {
            Self::NetworkRecord => Placement::Append,
            Self::Alarm | Self::WorkOrder => Placement::Prepend,
            Self::Kpi2g | Self::Kpi3g | Self::Kpi4g => Placement::Replace,
        }
    }
}

/// Where newly imported entities go relative to the existing collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// After existing entries.
    Append,
    /// Before existing entries, batch order preserved.
    Prepend,
    /// Discard existing entries.
    Replace,
}
