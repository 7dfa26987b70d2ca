// ── Aggregation over filtered snapshots ──
//
// Grouping always reports the full facet domain in declaration order, so a
// member with no entities still appears with a zero count. Every mean over
// an empty set is 0.0.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::model::{Alarm, Facet, Faceted, Kpi2gSample, Kpi3gSample, Kpi4gSample, NetworkRecord};

/// A numeric quantity that can be read off every entity of kind `T`.
pub trait Metric<T>: Copy + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Stable name, as used in serialized output.
    fn name(self) -> &'static str;

    fn value(self, item: &T) -> f64;
}

/// Arithmetic mean, or 0.0 for no values.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0_f64, 0_u32), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / f64::from(n) }
}

/// Mean of one metric over a set of entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricMean {
    pub metric: &'static str,
    pub mean: f64,
}

impl MetricMean {
    fn over<T, M: Metric<T>>(metric: M, items: &[&T]) -> Self {
        Self {
            metric: metric.name(),
            mean: mean(items.iter().map(|item| metric.value(item))),
        }
    }
}

fn means_of<T, M: Metric<T>>(items: &[&T], metrics: &[M]) -> Vec<MetricMean> {
    metrics
        .iter()
        .map(|m| MetricMean::over(*m, items))
        .collect()
}

/// The entities sharing one facet member, with derived statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<K> {
    pub key: K,
    pub count: usize,
    pub means: Vec<MetricMean>,
}

impl<K> Group<K> {
    /// Mean for `metric`, if it was requested.
    pub fn mean_of(&self, metric: &str) -> Option<f64> {
        self.means
            .iter()
            .find(|m| m.metric == metric)
            .map(|m| m.mean)
    }
}

/// Headline statistics over a whole set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub means: Vec<MetricMean>,
}

impl Summary {
    pub fn mean_of(&self, metric: &str) -> Option<f64> {
        self.means
            .iter()
            .find(|m| m.metric == metric)
            .map(|m| m.mean)
    }
}

/// Group `items` by facet `K`, one group per domain member.
///
/// Entities whose kind lacks `K` fall in no group.
pub fn group_by<K, T, M>(items: &[Arc<T>], metrics: &[M]) -> Vec<Group<K>>
where
    K: Facet,
    T: Faceted,
    M: Metric<T>,
{
    K::domain()
        .into_iter()
        .map(|key| {
            let members: Vec<&T> = items
                .iter()
                .map(AsRef::as_ref)
                .filter(|item| K::of(*item) == Some(key))
                .collect();
            Group {
                key,
                count: members.len(),
                means: means_of(&members, metrics),
            }
        })
        .collect()
}

/// Count `items` per member of facet `K`, in domain order.
pub fn count_by<K, T>(items: &[Arc<T>]) -> Vec<Group<K>>
where
    K: Facet,
    T: Faceted,
{
    K::domain()
        .into_iter()
        .map(|key| Group {
            key,
            count: items
                .iter()
                .filter(|item| K::of(*item) == Some(key))
                .count(),
            means: Vec::new(),
        })
        .collect()
}

pub fn summarize<T, M: Metric<T>>(items: &[Arc<T>], metrics: &[M]) -> Summary {
    let members: Vec<&T> = items.iter().map(AsRef::as_ref).collect();
    Summary {
        count: members.len(),
        means: means_of(&members, metrics),
    }
}

/// Alarms ordered most severe first. Equal severities keep input order.
pub fn by_severity(items: &[Arc<Alarm>]) -> Vec<Arc<Alarm>> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| b.status.cmp(&a.status));
    sorted
}

// ── Metrics ──────────────────────────────────────────────────────────

macro_rules! metric_enum {
    (
        $(#[$meta:meta])*
        $name:ident for $ty:ty { $($variant:ident => $field:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Serialize,
            Display,
            EnumString,
            EnumIter,
            IntoStaticStr,
            VariantNames,
        )]
        #[serde(rename_all = "camelCase")]
        #[strum(serialize_all = "camelCase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
        }

        impl Metric<$ty> for $name {
            fn name(self) -> &'static str {
                self.into()
            }

            fn value(self, item: &$ty) -> f64 {
                match self {
                    $(Self::$variant => item.$field),+
                }
            }
        }
    };
}

metric_enum! {
    /// Per-site performance metrics.
    NetworkMetric for NetworkRecord {
        Availability => availability,
        Throughput => throughput,
        Latency => latency,
        PacketLoss => packet_loss,
    }
}

metric_enum! {
    Kpi2gMetric for Kpi2gSample {
        CallSetupSuccessRate => call_setup_success_rate,
        DropCallRate => drop_call_rate,
        HandoverSuccessRate => handover_success_rate,
        SignalStrength => signal_strength,
    }
}

metric_enum! {
    Kpi3gMetric for Kpi3gSample {
        CallSetupSuccessRate => call_setup_success_rate,
        DropCallRate => drop_call_rate,
        HandoverSuccessRate => handover_success_rate,
        DataSpeed => data_speed,
        VoiceQuality => voice_quality,
        NetworkRegistrationTime => network_registration_time,
    }
}

metric_enum! {
    Kpi4gMetric for Kpi4gSample {
        RrcConnectionSetupRate => rrc_connection_setup_rate,
        AttachSuccessRate => attach_success_rate,
        ErabSuccessRate => erab_success_rate,
        Throughput => throughput,
        Latency => latency,
        SpectralEfficiency => spectral_efficiency,
    }
}
