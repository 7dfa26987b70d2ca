// ── Facets: closed categorical dimensions ──
//
// Every facet is a closed enumeration matched by exact, case-sensitive
// literal. Declaration order is the canonical domain order used for
// chart axes and grouped output.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr, VariantNames};

/// A closed categorical dimension used for filtering and grouping.
pub trait Facet:
    Copy
    + Eq
    + fmt::Debug
    + fmt::Display
    + FromStr
    + IntoEnumIterator
    + VariantNames
    + Into<&'static str>
    + Send
    + Sync
    + 'static
{
    /// Facet name as it appears in imported rows.
    const NAME: &'static str;

    /// Member substituted when an imported value is absent or unrecognized.
    const FALLBACK: Self;

    /// Read this facet off an entity, `None` if the entity kind lacks it.
    fn of<T: Faceted + ?Sized>(item: &T) -> Option<Self>;

    /// Every member, in declaration order.
    fn domain() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Exact literal match. Unrecognized casing is treated as unknown.
    fn parse_literal(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    fn literal(self) -> &'static str {
        self.into()
    }
}

/// Uniform facet access over every entity kind.
///
/// Kinds override only the facets they carry; the rest report `None`.
pub trait Faceted {
    fn vendor(&self) -> Option<Vendor> {
        None
    }
    fn technology(&self) -> Option<Technology> {
        None
    }
    fn region(&self) -> Option<Region> {
        None
    }
    fn alarm_status(&self) -> Option<AlarmStatus> {
        None
    }
    fn ticket_status(&self) -> Option<TicketStatus> {
        None
    }
    fn team(&self) -> Option<Team> {
        None
    }
    fn priority(&self) -> Option<Priority> {
        None
    }
    fn acknowledged(&self) -> Option<bool> {
        None
    }
}

impl<T: Faceted + ?Sized> Faceted for std::sync::Arc<T> {
    fn vendor(&self) -> Option<Vendor> {
        (**self).vendor()
    }
    fn technology(&self) -> Option<Technology> {
        (**self).technology()
    }
    fn region(&self) -> Option<Region> {
        (**self).region()
    }
    fn alarm_status(&self) -> Option<AlarmStatus> {
        (**self).alarm_status()
    }
    fn ticket_status(&self) -> Option<TicketStatus> {
        (**self).ticket_status()
    }
    fn team(&self) -> Option<Team> {
        (**self).team()
    }
    fn priority(&self) -> Option<Priority> {
        (**self).priority()
    }
    fn acknowledged(&self) -> Option<bool> {
        (**self).acknowledged()
    }
}

macro_rules! facet_impl {
    ($ty:ident, $name:literal, $fallback:ident, $accessor:ident) => {
        impl Facet for $ty {
            const NAME: &'static str = $name;
            const FALLBACK: Self = Self::$fallback;

            fn of<T: Faceted + ?Sized>(item: &T) -> Option<Self> {
                item.$accessor()
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                <Self as Facet>::FALLBACK
            }
        }
    };
}

// ── Vendor ──────────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    VariantNames,
)]
pub enum Vendor {
    Ericsson,
    Huawei,
    Nokia,
}

facet_impl!(Vendor, "vendor", Ericsson, vendor);

// ── Technology ──────────────────────────────────────────────────────

/// Radio access technology generation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    VariantNames,
)]
pub enum Technology {
    #[serde(rename = "2G")]
    #[strum(serialize = "2G")]
    Gsm,
    #[serde(rename = "3G")]
    #[strum(serialize = "3G")]
    Umts,
    #[serde(rename = "4G")]
    #[strum(serialize = "4G")]
    Lte,
}

facet_impl!(Technology, "technology", Lte, technology);

// ── Region ──────────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    VariantNames,
)]
pub enum Region {
    North,
    South,
    East,
    West,
    Central,
}

facet_impl!(Region, "region", Central, region);

// ── Alarm status ────────────────────────────────────────────────────

/// Alarm severity. Declaration order is display order (most severe
/// first); `Ord` ranks by severity so `Critical` is the maximum.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    VariantNames,
)]
pub enum AlarmStatus {
    Critical,
    Major,
    Minor,
    Normal,
}

impl AlarmStatus {
    pub fn severity(self) -> u8 {
        match self {
            Self::Critical => 3,
            Self::Major => 2,
            Self::Minor => 1,
            Self::Normal => 0,
        }
    }
}

impl Ord for AlarmStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.severity().cmp(&other.severity())
    }
}

impl PartialOrd for AlarmStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

facet_impl!(AlarmStatus, "status", Minor, alarm_status);

// ── Work-order facets ───────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    VariantNames,
)]
pub enum TicketStatus {
    Open,
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

facet_impl!(TicketStatus, "status", Open, ticket_status);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    VariantNames,
)]
pub enum Team {
    #[serde(rename = "R&D")]
    #[strum(serialize = "R&D")]
    RnD,
    Transmission,
    Core,
}

facet_impl!(Team, "team", RnD, team);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    VariantNames,
)]
pub enum Priority {
    High,
    Medium,
    Low,
}

facet_impl!(Priority, "priority", Medium, priority);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domains_keep_declaration_order() {
        assert_eq!(
            Vendor::domain(),
            vec![Vendor::Ericsson, Vendor::Huawei, Vendor::Nokia]
        );
        assert_eq!(Technology::VARIANTS, &["2G", "3G", "4G"]);
        assert_eq!(
            Region::VARIANTS,
            &["North", "South", "East", "West", "Central"]
        );
        assert_eq!(
            TicketStatus::VARIANTS,
            &["Open", "In Progress", "Resolved", "Closed"]
        );
        assert_eq!(Team::VARIANTS, &["R&D", "Transmission", "Core"]);
    }

    #[test]
    fn literal_parsing_is_case_sensitive() {
        assert_eq!(Vendor::parse_literal("Huawei"), Some(Vendor::Huawei));
        assert_eq!(Vendor::parse_literal("huawei"), None);
        assert_eq!(Technology::parse_literal("4G"), Some(Technology::Lte));
        assert_eq!(Technology::parse_literal("4g"), None);
        assert_eq!(Technology::parse_literal("Lte"), None);
        assert_eq!(
            TicketStatus::parse_literal("In Progress"),
            Some(TicketStatus::InProgress)
        );
        assert_eq!(Team::parse_literal("R&D"), Some(Team::RnD));
    }

    #[test]
    fn literals_round_trip_through_display() {
        for tech in Technology::domain() {
            assert_eq!(Technology::parse_literal(&tech.to_string()), Some(tech));
            assert_eq!(tech.literal(), tech.to_string());
        }
    }

    #[test]
    fn fallbacks_match_defaults() {
        assert_eq!(Vendor::default(), Vendor::Ericsson);
        assert_eq!(Technology::default(), Technology::Lte);
        assert_eq!(Region::default(), Region::Central);
        assert_eq!(AlarmStatus::default(), AlarmStatus::Minor);
        assert_eq!(TicketStatus::default(), TicketStatus::Open);
        assert_eq!(Team::default(), Team::RnD);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn alarm_status_orders_by_severity() {
        assert!(AlarmStatus::Critical > AlarmStatus::Major);
        assert!(AlarmStatus::Major > AlarmStatus::Minor);
        assert!(AlarmStatus::Minor > AlarmStatus::Normal);
        assert_eq!(AlarmStatus::domain().first(), Some(&AlarmStatus::Critical));
    }

    #[test]
    fn serde_uses_display_literals() {
        assert_eq!(
            serde_json::to_string(&Technology::Gsm).ok().as_deref(),
            Some("\"2G\"")
        );
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).ok().as_deref(),
            Some("\"In Progress\"")
        );
    }
}
