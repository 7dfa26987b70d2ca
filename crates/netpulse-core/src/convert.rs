// ── Row-to-domain type conversions ──
//
// The coercion table for every entity kind, plus the assembly from coerced
// values into the canonical type. Field names are the camelCase column
// headers used by imported and exported files. Adding an entity kind means
// adding one table and one `Schema` impl here.

use crate::model::{
    Alarm, AlarmStatus, EntityKind, Kpi2gSample, Kpi3gSample, Kpi4gSample, NetworkRecord,
    Priority, Region, Team, Technology, TicketStatus, Vendor, WorkOrder,
};
use crate::normalize::{Bounds, Coerced, CoercedRow, FieldRule, Rule, Schema, TextFallback};

const SITE_NAME: Rule = Rule::Text {
    fallback: TextFallback::SiteName,
};

// ── Network records ────────────────────────────────────────────────

impl Schema for NetworkRecord {
    const KIND: EntityKind = EntityKind::NetworkRecord;
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::new("id", Rule::Identity { prefix: "imported" }),
        FieldRule::new("vendor", Rule::facet::<Vendor>()),
        FieldRule::new("technology", Rule::facet::<Technology>()),
        FieldRule::new("region", Rule::facet::<Region>()),
        FieldRule::new("siteName", SITE_NAME),
        FieldRule::new("availability", Rule::number(95.0, Bounds::PERCENT)),
        FieldRule::new("throughput", Rule::number(50.0, Bounds::NON_NEGATIVE)),
        FieldRule::new("latency", Rule::number(20.0, Bounds::NON_NEGATIVE)),
        FieldRule::new("packetLoss", Rule::number(0.5, Bounds::NON_NEGATIVE)),
        FieldRule::new("timestamp", Rule::Timestamp),
    ];

    fn assemble(row: &mut CoercedRow) -> Self {
        Self {
            id: row.id("id"),
            vendor: row.facet("vendor"),
            technology: row.facet("technology"),
            region: row.facet("region"),
            site_name: row.text("siteName"),
            availability: row.number("availability"),
            throughput: row.number("throughput"),
            latency: row.number("latency"),
            packet_loss: row.number("packetLoss"),
            timestamp: row.timestamp("timestamp"),
        }
    }

    fn to_row(&self) -> CoercedRow {
        CoercedRow::new()
            .with("id", Coerced::Id(self.id.clone()))
            .with("vendor", Coerced::Literal(self.vendor.into()))
            .with("technology", Coerced::Literal(self.technology.into()))
            .with("region", Coerced::Literal(self.region.into()))
            .with("siteName", Coerced::Text(self.site_name.clone()))
            .with("availability", Coerced::Number(self.availability))
            .with("throughput", Coerced::Number(self.throughput))
            .with("latency", Coerced::Number(self.latency))
            .with("packetLoss", Coerced::Number(self.packet_loss))
            .with("timestamp", Coerced::Timestamp(self.timestamp))
    }
}

// ── Alarms ─────────────────────────────────────────────────────────

impl Schema for Alarm {
    const KIND: EntityKind = EntityKind::Alarm;
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::new("id", Rule::Identity { prefix: "IMP" }),
        FieldRule::new("status", Rule::facet::<AlarmStatus>()),
        FieldRule::new("vendor", Rule::facet::<Vendor>()),
        FieldRule::new("technology", Rule::facet::<Technology>()),
        FieldRule::new("region", Rule::facet::<Region>()),
        FieldRule::new("siteName", SITE_NAME),
        FieldRule::new("description", Rule::text("Imported alarm")),
        FieldRule::new("timestamp", Rule::Timestamp),
        FieldRule::new("acknowledged", Rule::Flag),
    ];

    fn assemble(row: &mut CoercedRow) -> Self {
        Self {
            id: row.id("id"),
            status: row.facet("status"),
            vendor: row.facet("vendor"),
            technology: row.facet("technology"),
            region: row.facet("region"),
            site_name: row.text("siteName"),
            description: row.text("description"),
            timestamp: row.timestamp("timestamp"),
            acknowledged: row.flag("acknowledged"),
        }
    }

    fn to_row(&self) -> CoercedRow {
        CoercedRow::new()
            .with("id", Coerced::Id(self.id.clone()))
            .with("status", Coerced::Literal(self.status.into()))
            .with("vendor", Coerced::Literal(self.vendor.into()))
            .with("technology", Coerced::Literal(self.technology.into()))
            .with("region", Coerced::Literal(self.region.into()))
            .with("siteName", Coerced::Text(self.site_name.clone()))
            .with("description", Coerced::Text(self.description.clone()))
            .with("timestamp", Coerced::Timestamp(self.timestamp))
            .with("acknowledged", Coerced::Flag(self.acknowledged))
    }
}

// ── Work orders ────────────────────────────────────────────────────

impl Schema for WorkOrder {
    const KIND: EntityKind = EntityKind::WorkOrder;
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::new("id", Rule::Identity { prefix: "IMP-WO" }),
        FieldRule::new(
            "ticketNumber",
            Rule::Text {
                fallback: TextFallback::TicketNumber,
            },
        ),
        FieldRule::new("description", Rule::text("Imported work order")),
        FieldRule::new("status", Rule::facet::<TicketStatus>()),
        FieldRule::new("team", Rule::facet::<Team>()),
        FieldRule::new("vendor", Rule::facet::<Vendor>()),
        FieldRule::new("technology", Rule::facet::<Technology>()),
        FieldRule::new("region", Rule::facet::<Region>()),
        FieldRule::new("priority", Rule::facet::<Priority>()),
        FieldRule::new("createdAt", Rule::Timestamp),
        FieldRule::new("updatedAt", Rule::Timestamp),
    ];

    fn assemble(row: &mut CoercedRow) -> Self {
        Self {
            id: row.id("id"),
            ticket_number: row.text("ticketNumber"),
            description: row.text("description"),
            status: row.facet("status"),
            team: row.facet("team"),
            vendor: row.facet("vendor"),
            technology: row.facet("technology"),
            region: row.facet("region"),
            priority: row.facet("priority"),
            created_at: row.timestamp("createdAt"),
            updated_at: row.timestamp("updatedAt"),
        }
    }

    fn to_row(&self) -> CoercedRow {
        CoercedRow::new()
            .with("id", Coerced::Id(self.id.clone()))
            .with("ticketNumber", Coerced::Text(self.ticket_number.clone()))
            .with("description", Coerced::Text(self.description.clone()))
            .with("status", Coerced::Literal(self.status.into()))
            .with("team", Coerced::Literal(self.team.into()))
            .with("vendor", Coerced::Literal(self.vendor.into()))
            .with("technology", Coerced::Literal(self.technology.into()))
            .with("region", Coerced::Literal(self.region.into()))
            .with("priority", Coerced::Literal(self.priority.into()))
            .with("createdAt", Coerced::Timestamp(self.created_at))
            .with("updatedAt", Coerced::Timestamp(self.updated_at))
    }
}

// ── KPI samples ────────────────────────────────────────────────────

impl Schema for Kpi2gSample {
    const KIND: EntityKind = EntityKind::Kpi2g;
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::new("timestamp", Rule::Timestamp),
        FieldRule::new("callSetupSuccessRate", Rule::number(95.0, Bounds::PERCENT)),
        FieldRule::new("dropCallRate", Rule::number(1.0, Bounds::PERCENT)),
        FieldRule::new("handoverSuccessRate", Rule::number(96.0, Bounds::PERCENT)),
        FieldRule::new("signalStrength", Rule::number(-80.0, Bounds::ANY)),
    ];

    fn assemble(row: &mut CoercedRow) -> Self {
        Self {
            timestamp: row.timestamp("timestamp"),
            call_setup_success_rate: row.number("callSetupSuccessRate"),
            drop_call_rate: row.number("dropCallRate"),
            handover_success_rate: row.number("handoverSuccessRate"),
            signal_strength: row.number("signalStrength"),
        }
    }

    fn to_row(&self) -> CoercedRow {
        CoercedRow::new()
            .with("timestamp", Coerced::Timestamp(self.timestamp))
            .with(
                "callSetupSuccessRate",
                Coerced::Number(self.call_setup_success_rate),
            )
            .with("dropCallRate", Coerced::Number(self.drop_call_rate))
            .with(
                "handoverSuccessRate",
                Coerced::Number(self.handover_success_rate),
            )
            .with("signalStrength", Coerced::Number(self.signal_strength))
    }
}

impl Schema for Kpi3gSample {
    const KIND: EntityKind = EntityKind::Kpi3g;
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::new("timestamp", Rule::Timestamp),
        FieldRule::new("callSetupSuccessRate", Rule::number(96.0, Bounds::PERCENT)),
        FieldRule::new("dropCallRate", Rule::number(0.8, Bounds::PERCENT)),
        FieldRule::new("handoverSuccessRate", Rule::number(97.0, Bounds::PERCENT)),
        FieldRule::new("dataSpeed", Rule::number(10.0, Bounds::NON_NEGATIVE)),
        FieldRule::new("voiceQuality", Rule::number(4.0, Bounds::NON_NEGATIVE)),
        FieldRule::new(
            "networkRegistrationTime",
            Rule::number(3.0, Bounds::NON_NEGATIVE),
        ),
    ];

    fn assemble(row: &mut CoercedRow) -> Self {
        Self {
            timestamp: row.timestamp("timestamp"),
            call_setup_success_rate: row.number("callSetupSuccessRate"),
            drop_call_rate: row.number("dropCallRate"),
            handover_success_rate: row.number("handoverSuccessRate"),
            data_speed: row.number("dataSpeed"),
            voice_quality: row.number("voiceQuality"),
            network_registration_time: row.number("networkRegistrationTime"),
        }
    }

    fn to_row(&self) -> CoercedRow {
        CoercedRow::new()
            .with("timestamp", Coerced::Timestamp(self.timestamp))
            .with(
                "callSetupSuccessRate",
                Coerced::Number(self.call_setup_success_rate),
            )
            .with("dropCallRate", Coerced::Number(self.drop_call_rate))
            .with(
                "handoverSuccessRate",
                Coerced::Number(self.handover_success_rate),
            )
            .with("dataSpeed", Coerced::Number(self.data_speed))
            .with("voiceQuality", Coerced::Number(self.voice_quality))
            .with(
                "networkRegistrationTime",
                Coerced::Number(self.network_registration_time),
            )
    }
}

impl Schema for Kpi4gSample {
    const KIND: EntityKind = EntityKind::Kpi4g;
    const FIELDS: &'static [FieldRule] = &[
        FieldRule::new("timestamp", Rule::Timestamp),
        FieldRule::new("rrcConnectionSetupRate", Rule::number(98.0, Bounds::PERCENT)),
        FieldRule::new("attachSuccessRate", Rule::number(97.0, Bounds::PERCENT)),
        FieldRule::new("erabSuccessRate", Rule::number(96.0, Bounds::PERCENT)),
        FieldRule::new("throughput", Rule::number(75.0, Bounds::NON_NEGATIVE)),
        FieldRule::new("latency", Rule::number(20.0, Bounds::NON_NEGATIVE)),
        FieldRule::new("spectralEfficiency", Rule::number(3.0, Bounds::NON_NEGATIVE)),
    ];

    fn assemble(row: &mut CoercedRow) -> Self {
        Self {
            timestamp: row.timestamp("timestamp"),
            rrc_connection_setup_rate: row.number("rrcConnectionSetupRate"),
            attach_success_rate: row.number("attachSuccessRate"),
            erab_success_rate: row.number("erabSuccessRate"),
            throughput: row.number("throughput"),
            latency: row.number("latency"),
            spectral_efficiency: row.number("spectralEfficiency"),
        }
    }

    fn to_row(&self) -> CoercedRow {
        CoercedRow::new()
            .with("timestamp", Coerced::Timestamp(self.timestamp))
            .with(
                "rrcConnectionSetupRate",
                Coerced::Number(self.rrc_connection_setup_rate),
            )
            .with("attachSuccessRate", Coerced::Number(self.attach_success_rate))
            .with("erabSuccessRate", Coerced::Number(self.erab_success_rate))
            .with("throughput", Coerced::Number(self.throughput))
            .with("latency", Coerced::Number(self.latency))
            .with(
                "spectralEfficiency",
                Coerced::Number(self.spectral_efficiency),
            )
    }
}
