// ── Generic reactive entity collection ──
//
// Ordered storage with push-based change notification via `watch`
// channels. Order is significant: it is insertion order adjusted by the
// placement rule of each import.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{EntityId, Identified, Placement};

/// One published state of a collection: the items and the number of
/// effective mutations that produced them.
///
/// Both travel in the same `watch` value, so a reader can never pair a new
/// item list with a stale version.
#[derive(Debug)]
pub(crate) struct Snapshot<T> {
    pub(crate) version: u64,
    pub(crate) items: Arc<Vec<Arc<T>>>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            items: Arc::clone(&self.items),
        }
    }
}

/// An ordered, reactive collection for a single entity type.
///
/// The whole collection lives in one [`Snapshot`] held by a `watch`
/// sender. Every mutation rewrites items and version inside a single
/// `send_modify` closure, so concurrent writers are serialized and readers
/// only ever observe complete states. Unchanged entities keep their `Arc`
/// across mutations.
pub(crate) struct EntityCollection<T: Clone + Send + Sync + 'static> {
    state: watch::Sender<Snapshot<T>>,
}

impl<T: Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(Snapshot {
            version: 0,
            items: Arc::new(Vec::new()),
        });

        Self { state }
    }

    /// Insert a batch according to `placement`. The batch keeps its own
    /// order in every case.
    pub(crate) fn insert(&self, batch: Vec<T>, placement: Placement) {
        let batch: Vec<Arc<T>> = batch.into_iter().map(Arc::new).collect();
        self.state.send_modify(|state| {
            let current = &state.items;
            let next = match placement {
                Placement::Append => {
                    let mut next = Vec::with_capacity(current.len() + batch.len());
                    next.extend(current.iter().cloned());
                    next.extend(batch);
                    next
                }
                Placement::Prepend => {
                    let mut next = Vec::with_capacity(current.len() + batch.len());
                    next.extend(batch);
                    next.extend(current.iter().cloned());
                    next
                }
                Placement::Replace => batch,
            };
            state.items = Arc::new(next);
            state.version += 1;
        });
    }

    /// Rewrite every entity for which `update` returns a replacement.
    ///
    /// Returns the resulting items and whether anything changed. When
    /// nothing matches, subscribers are not notified and the version is
    /// left alone.
    pub(crate) fn update_where<F>(&self, mut update: F) -> (Arc<Vec<Arc<T>>>, bool)
    where
        F: FnMut(&T) -> Option<T>,
    {
        let mut changed = false;
        self.state.send_if_modified(|state| {
            let next: Vec<Arc<T>> = state
                .items
                .iter()
                .map(|item| match update(item) {
                    Some(replacement) => {
                        changed = true;
                        Arc::new(replacement)
                    }
                    None => Arc::clone(item),
                })
                .collect();
            if changed {
                state.items = Arc::new(next);
                state.version += 1;
            }
            changed
        });
        (self.snapshot(), changed)
    }

    /// Current items (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        Arc::clone(&self.state.borrow().items)
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.state.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        self.state.borrow().version
    }

    pub(crate) fn len(&self) -> usize {
        self.state.borrow().items.len()
    }
}

impl<T: Identified + Clone + Send + Sync + 'static> EntityCollection<T> {
    /// First entity with this identity, in collection order.
    pub(crate) fn get_by_id(&self, id: &EntityId) -> Option<Arc<T>> {
        self.state.borrow().items.iter().find(|e| e.id() == id).cloned()
    }

    /// Replace the first entity sharing `entity`'s identity. Returns `false`
    /// and leaves the collection untouched when no entity matches.
    pub(crate) fn replace_by_id(&self, entity: T) -> bool {
        let mut pending = Some(entity);
        let (_, changed) = self.update_where(|current| {
            let matches = pending.as_ref().is_some_and(|e| e.id() == current.id());
            if matches { pending.take() } else { None }
        });
        changed
    }
}
