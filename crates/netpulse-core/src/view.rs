// ── Dashboard projections ──
//
// Read-only combinations of filter and aggregate over a store snapshot.
// `from_store` builds one frame; `watch` builds a `LiveView` that
// re-derives the overview whenever its collection changes.

use std::sync::Arc;

use serde::Serialize;

use crate::aggregate::{
    Group, Kpi2gMetric, Kpi3gMetric, Kpi4gMetric, Metric, NetworkMetric, Summary, by_severity,
    count_by, group_by, summarize,
};
use crate::filter::FacetFilter;
use crate::live::LiveView;
use crate::model::{
    Alarm, AlarmStatus, NetworkRecord, Region, Team, Technology, TicketStatus, Vendor, WorkOrder,
};
use crate::store::DataStore;

/// Network operations overview over the filtered site set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NocOverview {
    pub summary: Summary,
    /// Site count and mean availability per vendor.
    pub by_vendor: Vec<Group<Vendor>>,
    /// Site count and mean throughput per technology.
    pub by_technology: Vec<Group<Technology>>,
    pub by_region: Vec<Group<Region>>,
    pub records: Vec<Arc<NetworkRecord>>,
}

impl NocOverview {
    pub const HEADLINE: &'static [NetworkMetric] = &[
        NetworkMetric::Availability,
        NetworkMetric::Throughput,
        NetworkMetric::Latency,
    ];

    pub fn build(records: &[Arc<NetworkRecord>], filter: &FacetFilter) -> Self {
        let records = filter.apply(records);
        Self {
            summary: summarize(&records, Self::HEADLINE),
            by_vendor: group_by(&records, &[NetworkMetric::Availability]),
            by_technology: group_by(&records, &[NetworkMetric::Throughput]),
            by_region: count_by(&records),
            records,
        }
    }

    pub fn from_store(store: &DataStore, filter: &FacetFilter) -> Self {
        Self::build(&store.network_records_snapshot(), filter)
    }

    pub fn watch(store: &DataStore, filter: FacetFilter) -> LiveView<NetworkRecord, Self> {
        store.watch_network_records(move |records| Self::build(records, &filter))
    }
}

/// Alarm list plus severity counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmOverview {
    /// Counts over the whole collection, not the filtered list.
    pub status_counts: Vec<Group<AlarmStatus>>,
    pub unacknowledged: usize,
    pub alarms: Vec<Arc<Alarm>>,
}

impl AlarmOverview {
    pub fn build(alarms: &[Arc<Alarm>], filter: &FacetFilter) -> Self {
        Self {
            status_counts: count_by(alarms),
            unacknowledged: alarms.iter().filter(|a| !a.acknowledged).count(),
            alarms: filter.apply(alarms),
        }
    }

    pub fn from_store(store: &DataStore, filter: &FacetFilter) -> Self {
        Self::build(&store.alarms_snapshot(), filter)
    }

    /// Keep the overview current across imports and acknowledgment toggles.
    pub fn watch(store: &DataStore, filter: FacetFilter) -> LiveView<Alarm, Self> {
        store.watch_alarms(move |alarms| Self::build(alarms, &filter))
    }

    /// Reorder the listed alarms most severe first.
    pub fn by_severity(mut self) -> Self {
        self.alarms = by_severity(&self.alarms);
        self
    }

    pub fn count_of(&self, status: AlarmStatus) -> usize {
        self.status_counts
            .iter()
            .find(|g| g.key == status)
            .map_or(0, |g| g.count)
    }
}

/// Work-order list plus team and status counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderOverview {
    /// Counts over the whole collection, not the filtered list.
    pub by_team: Vec<Group<Team>>,
    pub by_status: Vec<Group<TicketStatus>>,
    pub work_orders: Vec<Arc<WorkOrder>>,
}

impl WorkOrderOverview {
    pub fn build(work_orders: &[Arc<WorkOrder>], filter: &FacetFilter) -> Self {
        Self {
            by_team: count_by(work_orders),
            by_status: count_by(work_orders),
            work_orders: filter.apply(work_orders),
        }
    }

    pub fn from_store(store: &DataStore, filter: &FacetFilter) -> Self {
        Self::build(&store.work_orders_snapshot(), filter)
    }

    pub fn watch(store: &DataStore, filter: FacetFilter) -> LiveView<WorkOrder, Self> {
        store.watch_work_orders(move |work_orders| Self::build(work_orders, &filter))
    }
}

/// Headline means for one KPI series.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiOverview {
    pub technology: Technology,
    pub summary: Summary,
}

impl KpiOverview {
    pub const HEADLINE_2G: &'static [Kpi2gMetric] = Kpi2gMetric::ALL;
    pub const HEADLINE_3G: &'static [Kpi3gMetric] = &[
        Kpi3gMetric::CallSetupSuccessRate,
        Kpi3gMetric::DataSpeed,
        Kpi3gMetric::VoiceQuality,
        Kpi3gMetric::NetworkRegistrationTime,
    ];
    pub const HEADLINE_4G: &'static [Kpi4gMetric] = &[
        Kpi4gMetric::RrcConnectionSetupRate,
        Kpi4gMetric::AttachSuccessRate,
        Kpi4gMetric::Throughput,
        Kpi4gMetric::Latency,
    ];

    pub fn build<T, M: Metric<T>>(technology: Technology, samples: &[Arc<T>], metrics: &[M]) -> Self {
        Self {
            technology,
            summary: summarize(samples, metrics),
        }
    }

    pub fn from_store(store: &DataStore, technology: Technology) -> Self {
        match technology {
            Technology::Gsm => Self::build(technology, &store.kpi_2g_snapshot(), Self::HEADLINE_2G),
            Technology::Umts => {
                Self::build(technology, &store.kpi_3g_snapshot(), Self::HEADLINE_3G)
            }
            Technology::Lte => Self::build(technology, &store.kpi_4g_snapshot(), Self::HEADLINE_4G),
        }
    }
}
