// ── Live dashboard views ──
//
// A `LiveView` follows one collection and re-derives a projection (an
// overview, a filtered list, a summary) each time that collection changes.
// Every frame is computed from one complete snapshot and remembers the
// collection version it was computed at.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::Snapshot;

type Projection<T, V> = Arc<dyn Fn(&[Arc<T>]) -> V + Send + Sync>;

/// A projection of one collection that stays current with it.
///
/// Construct through the `watch_*` methods on
/// [`DataStore`](crate::DataStore) or the `watch` constructors on the
/// dashboard views. Call [`refresh`](Self::refresh) after writes made on
/// the same thread, or await [`changed`](Self::changed) from another task.
pub struct LiveView<T, V> {
    receiver: watch::Receiver<Snapshot<T>>,
    project: Projection<T, V>,
    version: u64,
    current: V,
}

impl<T: Send + Sync + 'static, V> LiveView<T, V> {
    pub(crate) fn new(
        mut receiver: watch::Receiver<Snapshot<T>>,
        project: impl Fn(&[Arc<T>]) -> V + Send + Sync + 'static,
    ) -> Self {
        let project: Projection<T, V> = Arc::new(project);
        let state = receiver.borrow_and_update().clone();
        Self {
            current: project(&state.items),
            version: state.version,
            receiver,
            project,
        }
    }

    /// The latest derived frame.
    pub fn current(&self) -> &V {
        &self.current
    }

    pub fn into_current(self) -> V {
        self.current
    }

    /// Collection version the current frame was derived from.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Re-derive the frame if the collection moved on. Returns whether a
    /// new frame was produced.
    pub fn refresh(&mut self) -> bool {
        if matches!(self.receiver.has_changed(), Ok(true)) {
            self.rederive();
            true
        } else {
            false
        }
    }

    /// Wait for the next change and return the re-derived frame.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<&V> {
        self.receiver.changed().await.ok()?;
        self.rederive();
        Some(&self.current)
    }

    /// Convert into a `Stream` of frames. The first item is derived from
    /// the collection as it stands at conversion time.
    pub fn into_stream(self) -> LiveViewStream<T, V> {
        LiveViewStream {
            inner: WatchStream::new(self.receiver),
            project: self.project,
        }
    }

    fn rederive(&mut self) {
        let state = self.receiver.borrow_and_update().clone();
        self.version = state.version;
        self.current = (self.project)(&state.items);
        tracing::trace!(version = state.version, "live view re-derived");
    }
}

/// `Stream` of frames from a [`LiveView`].
pub struct LiveViewStream<T, V> {
    inner: WatchStream<Snapshot<T>>,
    project: Projection<T, V>,
}

impl<T: Send + Sync + 'static, V> Stream for LiveViewStream<T, V> {
    type Item = V;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<V>> {
        let this = self.get_mut();
        Pin::new(&mut this.inner)
            .poll_next(cx)
            .map(|state| state.map(|s| (this.project)(&s.items)))
    }
}
