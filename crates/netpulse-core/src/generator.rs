// ── Synthetic dataset generation ──
//
// Produces canonical entities for demos and tests. The store treats a
// generated dataset exactly like a completed import.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::{
    Alarm, EntityId, Facet, Kpi2gSample, Kpi3gSample, Kpi4gSample, NetworkRecord, Region,
    WorkOrder,
};

const ALARM_DESCRIPTIONS: &[&str] = &[
    "Cell outage",
    "High VSWR on sector antenna",
    "Transmission link down",
    "Power supply failure",
    "Cabinet temperature threshold exceeded",
    "Clock synchronization lost",
    "Backhaul packet loss above threshold",
];

const WORK_ORDER_DESCRIPTIONS: &[&str] = &[
    "Replace faulty RRU",
    "Investigate intermittent microwave link",
    "Core routing table cleanup",
    "Antenna tilt optimization",
    "Battery bank replacement",
    "Parameter audit after software upgrade",
];

/// One canonical entity set per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub network_records: Vec<NetworkRecord>,
    pub alarms: Vec<Alarm>,
    pub work_orders: Vec<WorkOrder>,
    pub kpi_2g: Vec<Kpi2gSample>,
    pub kpi_3g: Vec<Kpi3gSample>,
    pub kpi_4g: Vec<Kpi4gSample>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.network_records.is_empty()
            && self.alarms.is_empty()
            && self.work_orders.is_empty()
            && self.kpi_2g.is_empty()
            && self.kpi_3g.is_empty()
            && self.kpi_4g.is_empty()
    }
}

/// A source of canonical entities.
pub trait Generator {
    fn generate(&self) -> Dataset;
}

/// Seeded generator: the same settings always produce the same dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoGenerator {
    pub seed: u64,
    pub sites: usize,
    pub alarms: usize,
    pub work_orders: usize,
    /// Hourly samples per KPI series, ending at `anchor`.
    pub kpi_samples: usize,
    /// Reference instant all generated timestamps lead up to.
    pub anchor: DateTime<Utc>,
}

impl Default for DemoGenerator {
    fn default() -> Self {
        Self {
            seed: 0x6e70,
            sites: 60,
            alarms: 40,
            work_orders: 30,
            kpi_samples: 24,
            anchor: Utc
                .with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
                .single()
                .unwrap_or(DateTime::UNIX_EPOCH),
        }
    }
}

impl DemoGenerator {
    pub fn with_anchor(mut self, anchor: DateTime<Utc>) -> Self {
        self.anchor = anchor;
        self
    }

    fn network_records(&self, rng: &mut StdRng) -> Vec<NetworkRecord> {
        (1..=self.sites)
            .map(|n| {
                let region: Region = pick(rng);
                NetworkRecord {
                    id: EntityId::new(format!("SITE-{n:03}")),
                    vendor: pick(rng),
                    technology: pick(rng),
                    region,
                    site_name: site_name(region, n),
                    availability: round2(rng.gen_range(92.0..100.0)),
                    throughput: round2(rng.gen_range(10.0..150.0)),
                    latency: round2(rng.gen_range(5.0..60.0)),
                    packet_loss: round2(rng.gen_range(0.0..2.5)),
                    timestamp: self.anchor - Duration::minutes(rng.gen_range(0..60)),
                }
            })
            .collect()
    }

    fn alarms(&self, rng: &mut StdRng, sites: &[NetworkRecord]) -> Vec<Alarm> {
        let mut alarms: Vec<Alarm> = (1..=self.alarms)
            .map(|n| {
                let (vendor, technology, region, site_name) = match sites.choose(rng) {
                    Some(site) => (
                        site.vendor,
                        site.technology,
                        site.region,
                        site.site_name.clone(),
                    ),
                    None => (pick(rng), pick(rng), pick(rng), format!("Site-{n}")),
                };
                Alarm {
                    id: EntityId::new(format!("ALM-{n:04}")),
                    status: pick(rng),
                    vendor,
                    technology,
                    region,
                    site_name,
                    description: pick_text(rng, ALARM_DESCRIPTIONS),
                    timestamp: self.anchor - Duration::minutes(rng.gen_range(1..(72 * 60))),
                    acknowledged: rng.gen_bool(0.3),
                }
            })
            .collect();
        alarms.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        alarms
    }

    fn work_orders(&self, rng: &mut StdRng) -> Vec<WorkOrder> {
        let year = self.anchor.format("%Y");
        (1..=self.work_orders)
            .map(|n| {
                let created_at = self.anchor - Duration::hours(rng.gen_range(1..240));
                let updated_at = created_at + Duration::hours(rng.gen_range(0..48));
                WorkOrder {
                    id: EntityId::new(format!("WO-{n:04}")),
                    ticket_number: format!("TKT-{year}-{n:04}"),
                    description: pick_text(rng, WORK_ORDER_DESCRIPTIONS),
                    status: pick(rng),
                    team: pick(rng),
                    vendor: pick(rng),
                    technology: pick(rng),
                    region: pick(rng),
                    priority: pick(rng),
                    created_at,
                    updated_at: updated_at.min(self.anchor),
                }
            })
            .collect()
    }

    /// Sample instants, oldest first, one hour apart.
    fn sample_times(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        let count = i64::try_from(self.kpi_samples).unwrap_or(i64::MAX);
        (0..count).map(move |i| self.anchor - Duration::hours(count - 1 - i))
    }

    fn kpi_2g(&self, rng: &mut StdRng) -> Vec<Kpi2gSample> {
        self.sample_times()
            .map(|timestamp| Kpi2gSample {
                timestamp,
                call_setup_success_rate: round2(rng.gen_range(93.0..99.5)),
                drop_call_rate: round2(rng.gen_range(0.5..2.5)),
                handover_success_rate: round2(rng.gen_range(94.0..99.0)),
                signal_strength: round2(rng.gen_range(-95.0..-65.0)),
            })
            .collect()
    }

    fn kpi_3g(&self, rng: &mut StdRng) -> Vec<Kpi3gSample> {
        self.sample_times()
            .map(|timestamp| Kpi3gSample {
                timestamp,
                call_setup_success_rate: round2(rng.gen_range(94.0..99.5)),
                drop_call_rate: round2(rng.gen_range(0.3..1.8)),
                handover_success_rate: round2(rng.gen_range(95.0..99.5)),
                data_speed: round2(rng.gen_range(2.0..21.0)),
                voice_quality: round2(rng.gen_range(3.2..4.5)),
                network_registration_time: round2(rng.gen_range(1.5..5.0)),
            })
            .collect()
    }

    fn kpi_4g(&self, rng: &mut StdRng) -> Vec<Kpi4gSample> {
        self.sample_times()
            .map(|timestamp| Kpi4gSample {
                timestamp,
                rrc_connection_setup_rate: round2(rng.gen_range(96.0..99.9)),
                attach_success_rate: round2(rng.gen_range(95.0..99.8)),
                erab_success_rate: round2(rng.gen_range(94.0..99.5)),
                throughput: round2(rng.gen_range(20.0..150.0)),
                latency: round2(rng.gen_range(10.0..45.0)),
                spectral_efficiency: round2(rng.gen_range(1.5..5.5)),
            })
            .collect()
    }
}

impl Generator for DemoGenerator {
    fn generate(&self) -> Dataset {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let network_records = self.network_records(&mut rng);
        let alarms = self.alarms(&mut rng, &network_records);
        let work_orders = self.work_orders(&mut rng);
        let dataset = Dataset {
            kpi_2g: self.kpi_2g(&mut rng),
            kpi_3g: self.kpi_3g(&mut rng),
            kpi_4g: self.kpi_4g(&mut rng),
            network_records,
            alarms,
            work_orders,
        };
        tracing::debug!(
            seed = self.seed,
            sites = dataset.network_records.len(),
            alarms = dataset.alarms.len(),
            work_orders = dataset.work_orders.len(),
            kpi_samples = self.kpi_samples,
            "generated demo dataset"
        );
        dataset
    }
}

fn pick<F: Facet + Default>(rng: &mut StdRng) -> F {
    F::domain().choose(rng).copied().unwrap_or_default()
}

fn pick_text(rng: &mut StdRng, choices: &[&str]) -> String {
    choices.choose(rng).copied().unwrap_or_default().to_owned()
}

fn site_name(region: Region, n: usize) -> String {
    let prefix: String = region.literal().chars().take(3).collect();
    format!("{}-{n:03}", prefix.to_uppercase())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_sizes() {
        let data = DemoGenerator::default().generate();
        assert_eq!(data.network_records.len(), 60);
        assert_eq!(data.alarms.len(), 40);
        assert_eq!(data.work_orders.len(), 30);
        assert_eq!(data.kpi_2g.len(), 24);
        assert_eq!(data.kpi_3g.len(), 24);
        assert_eq!(data.kpi_4g.len(), 24);
    }

    #[test]
    fn same_seed_same_dataset() {
        let a = DemoGenerator::default().generate();
        let b = DemoGenerator::default().generate();
        assert_eq!(a, b);

        let other = DemoGenerator {
            seed: 7,
            ..DemoGenerator::default()
        }
        .generate();
        assert_ne!(a.network_records, other.network_records);
    }

    #[test]
    fn values_stay_in_canonical_ranges() {
        let data = DemoGenerator::default().generate();
        for site in &data.network_records {
            assert!((0.0..=100.0).contains(&site.availability));
            assert!(site.throughput >= 0.0 && site.latency >= 0.0 && site.packet_loss >= 0.0);
        }
        for wo in &data.work_orders {
            assert!(wo.updated_at >= wo.created_at);
        }
        for s in &data.kpi_2g {
            assert!(s.signal_strength < 0.0);
        }
    }

    #[test]
    fn alarms_are_newest_first_and_reference_sites() {
        let data = DemoGenerator::default().generate();
        assert!(data.alarms.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        let names: Vec<&str> = data
            .network_records
            .iter()
            .map(|s| s.site_name.as_str())
            .collect();
        assert!(data.alarms.iter().all(|a| names.contains(&a.site_name.as_str())));
    }

    #[test]
    fn kpi_series_is_hourly_and_ends_at_anchor() {
        let generator = DemoGenerator {
            kpi_samples: 3,
            ..DemoGenerator::default()
        };
        let data = generator.generate();
        let times: Vec<_> = data.kpi_4g.iter().map(|s| s.timestamp).collect();
        assert_eq!(
            times,
            vec![
                generator.anchor - Duration::hours(2),
                generator.anchor - Duration::hours(1),
                generator.anchor,
            ]
        );
    }

    #[test]
    fn empty_settings_give_empty_dataset() {
        let data = DemoGenerator {
            sites: 0,
            alarms: 0,
            work_orders: 0,
            kpi_samples: 0,
            ..DemoGenerator::default()
        }
        .generate();
        assert!(data.is_empty());
    }

    #[test]
    fn alarms_without_sites_get_placeholder_names() {
        let data = DemoGenerator {
            sites: 0,
            alarms: 2,
            ..DemoGenerator::default()
        }
        .generate();
        assert!(data.alarms.iter().all(|a| a.site_name.starts_with("Site-")));
    }

    #[test]
    fn site_names_carry_region_prefix() {
        assert_eq!(site_name(Region::North, 7), "NOR-007");
        assert_eq!(site_name(Region::Central, 12), "CEN-012");
    }
}
