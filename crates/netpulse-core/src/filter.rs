// ── Facet filter predicates ──
//
// Conjunctive, order-preserving filters over store snapshots. Filtering
// never touches the store and never fails; an empty result is just empty.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{
    AlarmStatus, Facet, Faceted, Priority, Region, Team, Technology, TicketStatus, Vendor,
};

/// A predicate over one facet: everything, or exactly one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection<F> {
    All,
    Only(F),
}

impl<F> Default for Selection<F> {
    fn default() -> Self {
        Self::All
    }
}

impl<F: Facet> Selection<F> {
    /// `All` holds for every entity. `Only` holds when the entity carries
    /// this facet with exactly that member; kinds without the facet never
    /// match.
    pub fn admits<T: Faceted + ?Sized>(&self, item: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(want) => F::of(item) == Some(*want),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<F: Facet> From<Option<F>> for Selection<F> {
    fn from(value: Option<F>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

impl<F: Facet> fmt::Display for Selection<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(member) => write!(f, "{member}"),
        }
    }
}

/// Returned when a selection names no member of the facet's domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {facet}; expected All or one of: {}", .expected.join(", "))]
pub struct SelectionParseError {
    pub facet: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

impl<F: Facet> FromStr for Selection<F> {
    type Err = SelectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            return Ok(Self::All);
        }
        F::parse_literal(s)
            .map(Self::Only)
            .ok_or_else(|| SelectionParseError {
                facet: F::NAME,
                value: s.to_owned(),
                expected: F::VARIANTS,
            })
    }
}

/// Tri-state acknowledgment predicate.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AckFilter {
    #[default]
    All,
    Acknowledged,
    Unacknowledged,
}

impl AckFilter {
    pub fn admits<T: Faceted + ?Sized>(self, item: &T) -> bool {
        match self {
            Self::All => true,
            Self::Acknowledged => item.acknowledged() == Some(true),
            Self::Unacknowledged => item.acknowledged() == Some(false),
        }
    }
}

/// One selection per facet. Every non-`All` selection must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FacetFilter {
    pub vendor: Selection<Vendor>,
    pub technology: Selection<Technology>,
    pub region: Selection<Region>,
    pub alarm_status: Selection<AlarmStatus>,
    pub ticket_status: Selection<TicketStatus>,
    pub team: Selection<Team>,
    pub priority: Selection<Priority>,
    pub acknowledged: AckFilter,
}

impl FacetFilter {
    /// The filter that admits everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn vendor(mut self, vendor: Vendor) -> Self {
        self.vendor = Selection::Only(vendor);
        self
    }

    pub fn technology(mut self, technology: Technology) -> Self {
        self.technology = Selection::Only(technology);
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.region = Selection::Only(region);
        self
    }

    pub fn alarm_status(mut self, status: AlarmStatus) -> Self {
        self.alarm_status = Selection::Only(status);
        self
    }

    pub fn ticket_status(mut self, status: TicketStatus) -> Self {
        self.ticket_status = Selection::Only(status);
        self
    }

    pub fn team(mut self, team: Team) -> Self {
        self.team = Selection::Only(team);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Selection::Only(priority);
        self
    }

    pub fn acknowledged(mut self, ack: AckFilter) -> Self {
        self.acknowledged = ack;
        self
    }

    /// `true` when no predicate is active.
    pub fn is_all(&self) -> bool {
        *self == Self::all()
    }

    pub fn matches<T: Faceted + ?Sized>(&self, item: &T) -> bool {
        self.vendor.admits(item)
            && self.technology.admits(item)
            && self.region.admits(item)
            && self.alarm_status.admits(item)
            && self.ticket_status.admits(item)
            && self.team.admits(item)
            && self.priority.admits(item)
            && self.acknowledged.admits(item)
    }

    /// Every entity that matches, in input order.
    pub fn apply<T: Faceted>(&self, items: &[Arc<T>]) -> Vec<Arc<T>> {
        items
            .iter()
            .filter(|item| self.matches(*item))
            .cloned()
            .collect()
    }
}
