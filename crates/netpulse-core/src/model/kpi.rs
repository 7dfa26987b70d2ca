// ── KPI time-series samples, one type per radio generation ──
//
// Each generation tracks its own metric set. A KPI import replaces the
// whole series for its generation, so samples carry no identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::facet::Faceted;

/// 2G (GSM) voice KPIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi2gSample {
    pub timestamp: DateTime<Utc>,
    pub call_setup_success_rate: f64,
    pub drop_call_rate: f64,
    pub handover_success_rate: f64,
    /// Received signal level in dBm, normally negative.
    pub signal_strength: f64,
}

/// 3G (UMTS) voice and data KPIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi3gSample {
    pub timestamp: DateTime<Utc>,
    pub call_setup_success_rate: f64,
    pub drop_call_rate: f64,
    pub handover_success_rate: f64,
    /// Mbps.
    pub data_speed: f64,
    /// Mean opinion score.
    pub voice_quality: f64,
    /// Seconds.
    pub network_registration_time: f64,
}

/// 4G (LTE) connection and capacity KPIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi4gSample {
    pub timestamp: DateTime<Utc>,
    pub rrc_connection_setup_rate: f64,
    pub attach_success_rate: f64,
    pub erab_success_rate: f64,
    /// Mbps.
    pub throughput: f64,
    /// Milliseconds.
    pub latency: f64,
    /// bit/s/Hz.
    pub spectral_efficiency: f64,
}

// KPI samples carry no categorical dimensions.
impl Faceted for Kpi2gSample {}
impl Faceted for Kpi3gSample {}
impl Faceted for Kpi4gSample {}
