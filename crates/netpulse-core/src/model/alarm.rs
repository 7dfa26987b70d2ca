// ── Alarm domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Identified;
use super::entity_id::EntityId;
use super::facet::{AlarmStatus, Faceted, Region, Technology, Vendor};

/// A network alarm raised against a site.
///
/// `status` is fixed at creation; `acknowledged` is the only field that
/// changes afterwards, and only through the store's toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub id: EntityId,
    pub status: AlarmStatus,
    pub vendor: Vendor,
    pub technology: Technology,
    pub region: Region,
    pub site_name: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub acknowledged: bool,
}

impl Identified for Alarm {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Faceted for Alarm {
    fn vendor(&self) -> Option<Vendor> {
        Some(self.vendor)
    }
    fn technology(&self) -> Option<Technology> {
        Some(self.technology)
    }
    fn region(&self) -> Option<Region> {
        Some(self.region)
    }
    fn alarm_status(&self) -> Option<AlarmStatus> {
        Some(self.status)
    }
    fn acknowledged(&self) -> Option<bool> {
        Some(self.acknowledged)
    }
}
