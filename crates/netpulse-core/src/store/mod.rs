// ── Reactive data store ──
//
// Ordered entity storage with push-based change notification.

mod collection;
mod data_store;

pub(crate) use collection::Snapshot;
pub use data_store::DataStore;
