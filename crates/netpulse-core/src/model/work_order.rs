// ── Work order (trouble ticket) domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Identified;
use super::entity_id::EntityId;
use super::facet::{Faceted, Priority, Region, Team, Technology, TicketStatus, Vendor};

/// A trouble ticket assigned to an operations team.
///
/// Ticket numbers are expected to be unique and `updated_at >= created_at`,
/// but neither is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: EntityId,
    pub ticket_number: String,
    pub description: String,
    pub status: TicketStatus,
    pub team: Team,
    pub vendor: Vendor,
    pub technology: Technology,
    pub region: Region,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identified for WorkOrder {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Faceted for WorkOrder {
    fn vendor(&self) -> Option<Vendor> {
        Some(self.vendor)
    }
    fn technology(&self) -> Option<Technology> {
        Some(self.technology)
    }
    fn region(&self) -> Option<Region> {
        Some(self.region)
    }
    fn ticket_status(&self) -> Option<TicketStatus> {
        Some(self.status)
    }
    fn team(&self) -> Option<Team> {
        Some(self.team)
    }
    fn priority(&self) -> Option<Priority> {
        Some(self.priority)
    }
}
