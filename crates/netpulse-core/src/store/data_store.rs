// ── Central reactive data store ──
//
// Sole owner of every canonical entity. Only imports and the acknowledgment
// toggle write to it; filters, aggregates and views read snapshots.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::EntityCollection;
use crate::generator::Dataset;
use crate::model::{
    Alarm, EntityId, EntityKind, Kpi2gSample, Kpi3gSample, Kpi4gSample, NetworkRecord, WorkOrder,
};
use crate::normalize::{CoercionDiagnostics, Row, Schema, normalize_at};
use crate::live::LiveView;

/// Central reactive store for all telemetry entities.
///
/// Each collection is written by one `send_modify` at a time, so an import
/// is applied atomically and two imports never interleave rows. Reads are
/// cheap `Arc` clones of the current snapshot.
pub struct DataStore {
    pub(crate) network_records: EntityCollection<NetworkRecord>,
    pub(crate) alarms: EntityCollection<Alarm>,
    pub(crate) work_orders: EntityCollection<WorkOrder>,
    pub(crate) kpi_2g: EntityCollection<Kpi2gSample>,
    pub(crate) kpi_3g: EntityCollection<Kpi3gSample>,
    pub(crate) kpi_4g: EntityCollection<Kpi4gSample>,
    pub(crate) last_import: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (last_import, _) = watch::channel(None);

        Self {
            network_records: EntityCollection::new(),
            alarms: EntityCollection::new(),
            work_orders: EntityCollection::new(),
            kpi_2g: EntityCollection::new(),
            kpi_3g: EntityCollection::new(),
            kpi_4g: EntityCollection::new(),
            last_import,
        }
    }

    // ── Imports ──────────────────────────────────────────────────────

    /// Normalize `rows` as `kind` and place them per the kind's placement
    /// rule. Never fails; substituted defaults are reported back.
    pub fn import(&self, kind: EntityKind, rows: &[Row]) -> CoercionDiagnostics {
        self.import_at(kind, rows, Utc::now())
    }

    /// As [`import`](Self::import), with an explicit "now" for defaulted
    /// timestamps and synthesized ticket numbers.
    pub fn import_at(
        &self,
        kind: EntityKind,
        rows: &[Row],
        now: DateTime<Utc>,
    ) -> CoercionDiagnostics {
        match kind {
            EntityKind::NetworkRecord => self.ingest(&self.network_records, rows, now),
            EntityKind::Alarm => self.ingest(&self.alarms, rows, now),
            EntityKind::WorkOrder => self.ingest(&self.work_orders, rows, now),
            EntityKind::Kpi2g => self.ingest(&self.kpi_2g, rows, now),
            EntityKind::Kpi3g => self.ingest(&self.kpi_3g, rows, now),
            EntityKind::Kpi4g => self.ingest(&self.kpi_4g, rows, now),
        }
    }

    pub fn import_network_records(&self, rows: &[Row]) -> CoercionDiagnostics {
        self.import(EntityKind::NetworkRecord, rows)
    }

    pub fn import_alarms(&self, rows: &[Row]) -> CoercionDiagnostics {
        self.import(EntityKind::Alarm, rows)
    }

    pub fn import_work_orders(&self, rows: &[Row]) -> CoercionDiagnostics {
        self.import(EntityKind::WorkOrder, rows)
    }

    /// Load an already-canonical dataset, as if each part had been imported.
    ///
    /// KPI series in the dataset replace the stored ones; the other kinds
    /// follow their usual placement.
    pub fn load(&self, dataset: Dataset) {
        let Dataset {
            network_records,
            alarms,
            work_orders,
            kpi_2g,
            kpi_3g,
            kpi_4g,
        } = dataset;
        Self::place(&self.network_records, network_records);
        Self::place(&self.alarms, alarms);
        Self::place(&self.work_orders, work_orders);
        Self::place(&self.kpi_2g, kpi_2g);
        Self::place(&self.kpi_3g, kpi_3g);
        Self::place(&self.kpi_4g, kpi_4g);
        self.last_import.send_replace(Some(Utc::now()));
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Flip `acknowledged` on every alarm with this identity.
    ///
    /// Returns the resulting alarm snapshot. An unknown identity is a
    /// silent no-op: the snapshot comes back unchanged and subscribers are
    /// not notified.
    pub fn toggle_acknowledged(&self, id: &EntityId) -> Arc<Vec<Arc<Alarm>>> {
        let (snapshot, changed) = self.alarms.update_where(|alarm| {
            (alarm.id == *id).then(|| Alarm {
                acknowledged: !alarm.acknowledged,
                ..alarm.clone()
            })
        });
        if changed {
            tracing::debug!(%id, "toggled alarm acknowledgment");
        } else {
            tracing::trace!(%id, "acknowledgment toggle matched no alarm");
        }
        snapshot
    }

    /// Replace the first alarm with the same identity. Returns `false` if
    /// there is none.
    pub fn replace_alarm(&self, alarm: Alarm) -> bool {
        self.alarms.replace_by_id(alarm)
    }

    pub fn replace_work_order(&self, work_order: WorkOrder) -> bool {
        self.work_orders.replace_by_id(work_order)
    }

    pub fn replace_network_record(&self, record: NetworkRecord) -> bool {
        self.network_records.replace_by_id(record)
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn network_records_snapshot(&self) -> Arc<Vec<Arc<NetworkRecord>>> {
        self.network_records.snapshot()
    }

    pub fn alarms_snapshot(&self) -> Arc<Vec<Arc<Alarm>>> {
        self.alarms.snapshot()
    }

    pub fn work_orders_snapshot(&self) -> Arc<Vec<Arc<WorkOrder>>> {
        self.work_orders.snapshot()
    }

    pub fn kpi_2g_snapshot(&self) -> Arc<Vec<Arc<Kpi2gSample>>> {
        self.kpi_2g.snapshot()
    }

    pub fn kpi_3g_snapshot(&self) -> Arc<Vec<Arc<Kpi3gSample>>> {
        self.kpi_3g.snapshot()
    }

    pub fn kpi_4g_snapshot(&self) -> Arc<Vec<Arc<Kpi4gSample>>> {
        self.kpi_4g.snapshot()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn network_record_by_id(&self, id: &EntityId) -> Option<Arc<NetworkRecord>> {
        self.network_records.get_by_id(id)
    }

    pub fn alarm_by_id(&self, id: &EntityId) -> Option<Arc<Alarm>> {
        self.alarms.get_by_id(id)
    }

    pub fn work_order_by_id(&self, id: &EntityId) -> Option<Arc<WorkOrder>> {
        self.work_orders.get_by_id(id)
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::NetworkRecord => self.network_records.len(),
            EntityKind::Alarm => self.alarms.len(),
            EntityKind::WorkOrder => self.work_orders.len(),
            EntityKind::Kpi2g => self.kpi_2g.len(),
            EntityKind::Kpi3g => self.kpi_3g.len(),
            EntityKind::Kpi4g => self.kpi_4g.len(),
        }
    }

    /// Number of effective mutations applied to a collection so far.
    pub fn version(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::NetworkRecord => self.network_records.version(),
            EntityKind::Alarm => self.alarms.version(),
            EntityKind::WorkOrder => self.work_orders.version(),
            EntityKind::Kpi2g => self.kpi_2g.version(),
            EntityKind::Kpi3g => self.kpi_3g.version(),
            EntityKind::Kpi4g => self.kpi_4g.version(),
        }
    }

    // ── Live views ──────────────────────────────────────────────────

    /// Follow the network records through `project`, re-deriving on every
    /// change. The other `watch_*` methods do the same for their kind.
    pub fn watch_network_records<V>(
        &self,
        project: impl Fn(&[Arc<NetworkRecord>]) -> V + Send + Sync + 'static,
    ) -> LiveView<NetworkRecord, V> {
        LiveView::new(self.network_records.subscribe(), project)
    }

    pub fn watch_alarms<V>(
        &self,
        project: impl Fn(&[Arc<Alarm>]) -> V + Send + Sync + 'static,
    ) -> LiveView<Alarm, V> {
        LiveView::new(self.alarms.subscribe(), project)
    }

    pub fn watch_work_orders<V>(
        &self,
        project: impl Fn(&[Arc<WorkOrder>]) -> V + Send + Sync + 'static,
    ) -> LiveView<WorkOrder, V> {
        LiveView::new(self.work_orders.subscribe(), project)
    }

    pub fn watch_kpi_2g<V>(
        &self,
        project: impl Fn(&[Arc<Kpi2gSample>]) -> V + Send + Sync + 'static,
    ) -> LiveView<Kpi2gSample, V> {
        LiveView::new(self.kpi_2g.subscribe(), project)
    }

    pub fn watch_kpi_3g<V>(
        &self,
        project: impl Fn(&[Arc<Kpi3gSample>]) -> V + Send + Sync + 'static,
    ) -> LiveView<Kpi3gSample, V> {
        LiveView::new(self.kpi_3g.subscribe(), project)
    }

    pub fn watch_kpi_4g<V>(
        &self,
        project: impl Fn(&[Arc<Kpi4gSample>]) -> V + Send + Sync + 'static,
    ) -> LiveView<Kpi4gSample, V> {
        LiveView::new(self.kpi_4g.subscribe(), project)
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_import(&self) -> Option<DateTime<Utc>> {
        *self.last_import.borrow()
    }

    /// How long ago the last import landed, or `None` if nothing has.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_import().map(|t| Utc::now() - t)
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn ingest<T: Schema>(
        &self,
        collection: &EntityCollection<T>,
        rows: &[Row],
        now: DateTime<Utc>,
    ) -> CoercionDiagnostics {
        let normalized = normalize_at::<T>(rows, now);
        let count = normalized.entities.len();
        collection.insert(normalized.entities, T::KIND.placement());
        self.last_import.send_replace(Some(now));
        tracing::info!(
            kind = %T::KIND,
            count,
            fallbacks = normalized.diagnostics.total_fallbacks(),
            "import applied"
        );
        normalized.diagnostics
    }

    fn place<T: Schema>(collection: &EntityCollection<T>, entities: Vec<T>) {
        let count = entities.len();
        collection.insert(entities, T::KIND.placement());
        tracing::debug!(kind = %T::KIND, count, "loaded canonical entities");
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;

    fn rows(values: &[Value]) -> Vec<Row> {
        values
            .iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    fn alarm_ids(store: &DataStore) -> Vec<String> {
        store
            .alarms_snapshot()
            .iter()
            .map(|a| a.id.to_string())
            .collect()
    }

    #[test]
    fn alarms_are_prepended_in_batch_order() {
        let store = DataStore::new();
        store.import_alarms(&rows(&[json!({"id": "old-1"}), json!({"id": "old-2"})]));
        store.import_alarms(&rows(&[json!({"id": "new-1"}), json!({"id": "new-2"})]));
        assert_eq!(alarm_ids(&store), vec!["new-1", "new-2", "old-1", "old-2"]);
    }

    #[test]
    fn network_records_are_appended() {
        let store = DataStore::new();
        store.import_network_records(&rows(&[json!({"id": "a"})]));
        store.import_network_records(&rows(&[json!({"id": "b"})]));
        let ids: Vec<String> = store
            .network_records_snapshot()
            .iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn kpi_imports_replace_the_series() {
        let store = DataStore::new();
        store.import(EntityKind::Kpi4g, &rows(&[json!({}), json!({}), json!({})]));
        store.import(EntityKind::Kpi4g, &rows(&[json!({"throughput": "120"})]));
        let series = store.kpi_4g_snapshot();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].throughput, 120.0);
        assert_eq!(store.count(EntityKind::Kpi2g), 0);
    }

    #[test]
    fn import_records_timestamp_and_version() {
        let store = DataStore::new();
        assert!(store.last_import().is_none());
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let diagnostics = store.import_at(EntityKind::WorkOrder, &rows(&[json!({})]), now);
        assert_eq!(diagnostics.rows, 1);
        assert_eq!(store.last_import(), Some(now));
        assert_eq!(store.version(EntityKind::WorkOrder), 1);
        assert_eq!(store.version(EntityKind::Alarm), 0);
        assert_eq!(store.work_orders_snapshot()[0].created_at, now);
    }

    #[test]
    fn toggle_flips_and_restores() {
        let store = DataStore::new();
        store.import_alarms(&rows(&[
            json!({"id": "a1", "acknowledged": "false"}),
            json!({"id": "a2", "acknowledged": true}),
        ]));
        let id = EntityId::from("a1");

        let after = store.toggle_acknowledged(&id);
        assert!(after[0].acknowledged);
        assert!(after[1].acknowledged);
        assert!(store.alarm_by_id(&id).unwrap().acknowledged);

        let restored = store.toggle_acknowledged(&id);
        assert!(!restored[0].acknowledged);
        assert_eq!(store.version(EntityKind::Alarm), 3);
    }

    #[test]
    fn toggle_unknown_id_changes_nothing() {
        let store = DataStore::new();
        store.import_alarms(&rows(&[json!({"id": "a1"})]));
        let before = store.alarms_snapshot();
        let after = store.toggle_acknowledged(&EntityId::from("nope"));
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(store.version(EntityKind::Alarm), 1);
    }

    #[test]
    fn toggle_flips_every_duplicate() {
        let store = DataStore::new();
        store.import_alarms(&rows(&[json!({"id": "dup"}), json!({"id": "dup"})]));
        let after = store.toggle_acknowledged(&EntityId::from("dup"));
        assert!(after.iter().all(|a| a.acknowledged));
    }

    #[test]
    fn replace_alarm_by_identity() {
        let store = DataStore::new();
        store.import_alarms(&rows(&[json!({"id": "a1", "description": "before"})]));
        let mut alarm = (*store.alarm_by_id(&EntityId::from("a1")).unwrap()).clone();
        alarm.description = "after".into();
        assert!(store.replace_alarm(alarm.clone()));
        assert_eq!(store.alarms_snapshot()[0].description, "after");

        alarm.id = EntityId::from("ghost");
        assert!(!store.replace_alarm(alarm));
        assert_eq!(store.count(EntityKind::Alarm), 1);
    }

    #[test]
    fn watched_projection_observes_import() {
        let store = DataStore::new();
        let mut view = store.watch_alarms(<[Arc<Alarm>]>::len);
        assert_eq!(*view.current(), 0);
        store.import_alarms(&rows(&[json!({"id": "a1"})]));
        assert_eq!(tokio_test::block_on(view.changed()).copied(), Some(1));
        assert_eq!(view.version(), store.version(EntityKind::Alarm));
    }
}
