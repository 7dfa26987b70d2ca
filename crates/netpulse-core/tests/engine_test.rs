// Integration tests for the import → store → filter → aggregate pipeline.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use netpulse_core::aggregate::{NetworkMetric, count_by, group_by, summarize};
use netpulse_core::normalize::normalize;
use netpulse_core::tabular::{export_csv, parse_rows};
use netpulse_core::{
    AckFilter, Alarm, AlarmStatus, Command, CommandResult, CoreError, DemoGenerator, Engine,
    EntityId, EntityKind, FacetFilter, Facet, Faceted, Kpi2gSample, Kpi3gSample, Kpi4gSample,
    NetworkRecord, Priority, Region, Row, RowFormat, Schema, Selection, Team, Technology,
    TicketStatus, Vendor, WorkOrder,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn rows(values: &[Value]) -> Vec<Row> {
    values
        .iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
}

fn seeded() -> Engine {
    Engine::seeded(&DemoGenerator::default())
}

/// Every combination of one vendor, technology and region selection.
fn filter_grid() -> Vec<FacetFilter> {
    let mut vendors: Vec<Selection<Vendor>> = vec![Selection::All];
    vendors.extend(Vendor::domain().into_iter().map(Selection::Only));
    let mut techs: Vec<Selection<Technology>> = vec![Selection::All];
    techs.extend(Technology::domain().into_iter().map(Selection::Only));
    let mut regions: Vec<Selection<Region>> = vec![Selection::All];
    regions.extend(Region::domain().into_iter().map(Selection::Only));

    let mut grid = Vec::new();
    for vendor in &vendors {
        for technology in &techs {
            for region in &regions {
                grid.push(FacetFilter {
                    vendor: *vendor,
                    technology: *technology,
                    region: *region,
                    ..FacetFilter::all()
                });
            }
        }
    }
    grid
}

fn reimport<T: Schema + PartialEq + std::fmt::Debug>(items: &[Arc<T>]) {
    let csv = export_csv(items).unwrap();
    let parsed = parse_rows(csv.as_bytes(), RowFormat::Csv).unwrap();
    let again = normalize::<T>(&parsed);
    assert!(again.diagnostics.is_clean(), "{}: {:?}", T::KIND, again.diagnostics);
    let originals: Vec<T> = items.iter().map(|i| (**i).clone()).collect();
    assert_eq!(again.entities, originals);
}

// ── Scenario ────────────────────────────────────────────────────────

#[test]
fn imported_alarm_defaults_filter_and_group() {
    let engine = Engine::new();
    let result = engine
        .execute(Command::Import {
            kind: EntityKind::Alarm,
            rows: rows(&[json!({
                "status": "Critical",
                "vendor": "Huawei",
                "timestamp": "2024-01-01T00:00:00Z",
            })]),
        })
        .unwrap();
    assert!(matches!(result, CommandResult::Imported { .. }));

    let alarms = engine.store().alarms_snapshot();
    assert_eq!(alarms.len(), 1);
    let alarm = &alarms[0];
    assert_eq!(alarm.status, AlarmStatus::Critical);
    assert_eq!(alarm.vendor, Vendor::Huawei);
    assert_eq!(alarm.region, Region::Central);
    assert_eq!(alarm.technology, Technology::Lte);
    assert!(!alarm.acknowledged);
    assert_eq!(alarm.description, "Imported alarm");
    assert_eq!(alarm.timestamp.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    assert!(alarm.id.as_str().starts_with("IMP-"));

    let north = FacetFilter::all().region(Region::North).apply(&alarms);
    assert!(north.is_empty());

    let by_region = count_by::<Region, _>(&north);
    assert_eq!(by_region.len(), 5);
    assert_eq!(by_region[0].key, Region::North);
    assert_eq!(by_region[0].count, 0);

    let by_region_all = count_by::<Region, _>(&alarms);
    assert_eq!(by_region_all[4].key, Region::Central);
    assert_eq!(by_region_all[4].count, 1);
}

// ── Filter properties ───────────────────────────────────────────────

#[test]
fn filter_result_is_exact_ordered_subset() {
    let engine = seeded();
    let sites = engine.store().network_records_snapshot();

    for filter in filter_grid() {
        let out = filter.apply(&sites);
        let expected: Vec<Arc<NetworkRecord>> = sites
            .iter()
            .filter(|s| {
                (filter.vendor.is_all() || filter.vendor == Selection::Only(s.vendor))
                    && (filter.technology.is_all()
                        || filter.technology == Selection::Only(s.technology))
                    && (filter.region.is_all() || filter.region == Selection::Only(s.region))
            })
            .cloned()
            .collect();
        assert_eq!(out, expected, "filter {filter:?}");
    }
}

#[test]
fn all_filter_returns_collection_unchanged() {
    let engine = seeded();
    let alarms = engine.store().alarms_snapshot();
    let out = FacetFilter::all().apply(&alarms);
    assert_eq!(out.len(), alarms.len());
    assert!(out.iter().zip(alarms.iter()).all(|(a, b)| Arc::ptr_eq(a, b)));
}

#[test]
fn filtering_never_mutates_store() {
    let engine = seeded();
    let store = engine.store();
    let version = store.version(EntityKind::WorkOrder);
    let before = store.work_orders_snapshot();
    let _ = FacetFilter::all()
        .team(Team::Core)
        .priority(Priority::High)
        .ticket_status(TicketStatus::Open)
        .apply(&before);
    assert_eq!(store.version(EntityKind::WorkOrder), version);
    assert!(Arc::ptr_eq(&before, &store.work_orders_snapshot()));
}

#[test]
fn ack_partitions_alarms() {
    let engine = seeded();
    let alarms = engine.store().alarms_snapshot();
    let acked = FacetFilter::all()
        .acknowledged(AckFilter::Acknowledged)
        .apply(&alarms);
    let open = FacetFilter::all()
        .acknowledged(AckFilter::Unacknowledged)
        .apply(&alarms);
    assert_eq!(acked.len() + open.len(), alarms.len());
    assert!(acked.iter().all(|a| a.acknowledged() == Some(true)));
}

// ── Aggregation properties ──────────────────────────────────────────

#[test]
fn grouping_always_reports_full_domain() {
    let engine = seeded();
    let store = engine.store();
    let none: Vec<Arc<NetworkRecord>> = Vec::new();

    for sites in [store.network_records_snapshot().to_vec(), none] {
        let vendors = group_by::<Vendor, _, _>(&sites, &[NetworkMetric::Availability]);
        let techs = group_by::<Technology, _, _>(&sites, &[NetworkMetric::Throughput]);
        let regions = count_by::<Region, _>(&sites);
        assert_eq!(vendors.len(), 3);
        assert_eq!(techs.len(), 3);
        assert_eq!(regions.len(), 5);
        assert_eq!(regions.iter().map(|g| g.count).sum::<usize>(), sites.len());
        for group in vendors.iter().filter(|g| g.count == 0) {
            assert_eq!(group.mean_of("availability"), Some(0.0));
        }
    }

    let alarms = store.alarms_snapshot();
    let work_orders = store.work_orders_snapshot();
    assert_eq!(count_by::<AlarmStatus, _>(&alarms).len(), 4);
    assert_eq!(count_by::<TicketStatus, _>(&work_orders).len(), 4);
    assert_eq!(count_by::<Team, _>(&work_orders).len(), 3);
    assert_eq!(count_by::<Priority, _>(&work_orders).len(), 3);
}

#[test]
fn empty_filter_result_aggregates_to_zero() {
    let engine = Engine::new();
    engine.store().import_network_records(&rows(&[json!({"region": "West"})]));
    let sites = engine.store().network_records_snapshot();
    let filtered = FacetFilter::all().region(Region::East).apply(&sites);
    let summary = summarize(&filtered, NetworkMetric::ALL);
    assert_eq!(summary.count, 0);
    assert!(summary.means.iter().all(|m| m.mean == 0.0));
}

// ── Coercion idempotence ────────────────────────────────────────────

#[test]
fn csv_round_trip_reproduces_every_kind() {
    let engine = seeded();
    let store = engine.store();
    reimport::<NetworkRecord>(&store.network_records_snapshot());
    reimport::<Alarm>(&store.alarms_snapshot());
    reimport::<WorkOrder>(&store.work_orders_snapshot());
    reimport::<Kpi2gSample>(&store.kpi_2g_snapshot());
    reimport::<Kpi3gSample>(&store.kpi_3g_snapshot());
    reimport::<Kpi4gSample>(&store.kpi_4g_snapshot());
}

#[test]
fn dropped_identity_is_resynthesized() {
    let engine = seeded();
    let alarms = engine.store().alarms_snapshot();
    let csv = export_csv(&alarms[..1]).unwrap();
    let mut parsed = parse_rows(csv.as_bytes(), RowFormat::Csv).unwrap();
    parsed[0].remove("id");

    let again = normalize::<Alarm>(&parsed).entities.remove(0);
    assert_ne!(again.id, alarms[0].id);
    assert!(again.id.as_str().starts_with("IMP-"));
    let restored = Alarm {
        id: alarms[0].id.clone(),
        ..again
    };
    assert_eq!(restored, *alarms[0]);
}

// ── Mutator ─────────────────────────────────────────────────────────

#[test]
fn toggle_twice_is_identity() {
    let engine = seeded();
    let store = engine.store();
    let original = store.alarms_snapshot();
    let id = original[3].id.clone();

    store.toggle_acknowledged(&id);
    let twice = store.toggle_acknowledged(&id);

    let flags = |list: &[Arc<Alarm>]| list.iter().map(|a| a.acknowledged).collect::<Vec<_>>();
    assert_eq!(flags(&twice), flags(&original));
}

#[test]
fn toggle_unknown_identity_is_silent() {
    let engine = seeded();
    let before = engine.store().alarms_snapshot();
    let result = engine
        .execute(Command::ToggleAcknowledged {
            id: EntityId::from("does-not-exist"),
        })
        .unwrap();
    let CommandResult::Alarms { alarms } = result else {
        panic!("expected alarms");
    };
    assert!(Arc::ptr_eq(&before, &alarms));
}

// ── Store placement ─────────────────────────────────────────────────

#[test]
fn placement_per_kind() {
    let engine = seeded();
    let store = engine.store();
    let sites_before = store.network_records_snapshot();
    let alarms_before = store.alarms_snapshot();

    store.import_network_records(&rows(&[json!({"id": "new-site"})]));
    store.import_alarms(&rows(&[json!({"id": "new-1"}), json!({"id": "new-2"})]));
    store.import(EntityKind::Kpi2g, &rows(&[json!({})]));

    let sites = store.network_records_snapshot();
    assert_eq!(sites.len(), sites_before.len() + 1);
    assert_eq!(sites.last().unwrap().id.as_str(), "new-site");

    let alarms = store.alarms_snapshot();
    assert_eq!(alarms[0].id.as_str(), "new-1");
    assert_eq!(alarms[1].id.as_str(), "new-2");
    assert!(Arc::ptr_eq(&alarms[2], &alarms_before[0]));

    assert_eq!(store.kpi_2g_snapshot().len(), 1);
}

#[test]
fn crafted_duplicate_identity_coexists() {
    let engine = seeded();
    let store = engine.store();
    let existing = store.alarms_snapshot()[0].id.clone();
    store.import_alarms(&rows(&[json!({"id": existing.as_str(), "status": "Normal"})]));

    let matching = store
        .alarms_snapshot()
        .iter()
        .filter(|a| a.id == existing)
        .count();
    assert_eq!(matching, 2);
    assert_eq!(store.alarm_by_id(&existing).unwrap().status, AlarmStatus::Normal);
}

#[test]
fn rejected_file_changes_nothing() {
    let engine = seeded();
    let store = engine.store();
    let counts: Vec<usize> = [EntityKind::NetworkRecord, EntityKind::Kpi4g]
        .iter()
        .map(|k| store.count(*k))
        .collect();

    for (kind, format, bytes) in [
        (EntityKind::NetworkRecord, RowFormat::Txt, &b"id,vendor\n\xff,Nokia\n"[..]),
        (EntityKind::Kpi4g, RowFormat::Xlsx, &b"throughput\n1\n"[..]),
    ] {
        let err = engine
            .execute(Command::ImportFile {
                kind,
                format,
                bytes: bytes.to_vec(),
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::ImportParse { .. }));
    }

    let after: Vec<usize> = [EntityKind::NetworkRecord, EntityKind::Kpi4g]
        .iter()
        .map(|k| store.count(*k))
        .collect();
    assert_eq!(after, counts);
}

// ── Raw files ───────────────────────────────────────────────────────

#[test]
fn short_rows_still_import() {
    let engine = Engine::new();
    let result = engine
        .execute(Command::ImportFile {
            kind: EntityKind::Alarm,
            format: RowFormat::Csv,
            bytes: b"id,status,vendor\nA1,Critical,Huawei\nA2,Major\n".to_vec(),
        })
        .unwrap();
    let CommandResult::Imported { diagnostics, .. } = result else {
        panic!("expected import result");
    };
    assert_eq!(diagnostics.rows, 2);

    let a2 = engine.store().alarm_by_id(&EntityId::from("A2")).unwrap();
    assert_eq!(a2.status, AlarmStatus::Major);
    assert_eq!(a2.vendor, Vendor::Ericsson);
}

#[test]
fn tab_delimited_txt_imports_by_column() {
    let engine = Engine::new();
    engine
        .execute(Command::ImportFile {
            kind: EntityKind::Alarm,
            format: RowFormat::Txt,
            bytes: b"id\tstatus\tvendor\nA1\tCritical\tHuawei\n".to_vec(),
        })
        .unwrap();
    let a1 = engine.store().alarm_by_id(&EntityId::from("A1")).unwrap();
    assert_eq!(a1.status, AlarmStatus::Critical);
    assert_eq!(a1.vendor, Vendor::Huawei);
}

#[test]
fn workbook_export_reimports_every_alarm() {
    let engine = seeded();
    let workbook = engine.export(EntityKind::Alarm, RowFormat::Xlsx).unwrap();

    let fresh = Engine::new();
    fresh
        .execute(Command::ImportFile {
            kind: EntityKind::Alarm,
            format: RowFormat::Xlsx,
            bytes: workbook,
        })
        .unwrap();
    let original: Vec<Alarm> = engine
        .store()
        .alarms_snapshot()
        .iter()
        .map(|a| (**a).clone())
        .collect();
    let reimported: Vec<Alarm> = fresh
        .store()
        .alarms_snapshot()
        .iter()
        .map(|a| (**a).clone())
        .collect();
    assert_eq!(reimported, original);
}
