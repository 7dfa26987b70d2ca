// ── Network (site) performance records ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Identified;
use super::entity_id::EntityId;
use super::facet::{Faceted, Region, Technology, Vendor};

/// One site's radio-network performance reading.
///
/// Availability is a percentage in `[0, 100]`; throughput (Mbps), latency
/// (ms) and packet loss (%) are non-negative. All numeric fields are finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRecord {
    pub id: EntityId,
    pub vendor: Vendor,
    pub technology: Technology,
    pub region: Region,
    pub site_name: String,
    pub availability: f64,
    pub throughput: f64,
    pub latency: f64,
    pub packet_loss: f64,
    pub timestamp: DateTime<Utc>,
}

impl Identified for NetworkRecord {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Faceted for NetworkRecord {
    fn vendor(&self) -> Option<Vendor> {
        Some(self.vendor)
    }
    fn technology(&self) -> Option<Technology> {
        Some(self.technology)
    }
    fn region(&self) -> Option<Region> {
        Some(self.region)
    }
}
