//! Lists fed by live snapshots.

use std::collections::HashSet;
use std::pin::Pin;

use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::Result;
use crate::catalog::{Document, LiveQuery};
use crate::traits::{SnapshotSource, Snapshots};

/// What applying one stream event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveUpdate {
    /// The first snapshot arrived.
    Loaded,
    /// A later snapshot replaced the list.
    Refreshed,
    /// The stream reported an error; the last good snapshot is kept.
    Failed,
}

/// The latest snapshot of a live query.
#[derive(Debug, Clone)]
pub struct LiveList<D: Document> {
    items: Vec<D>,
    loading: bool,
    error: Option<String>,
    snapshots: u64,
}

impl<D: Document> LiveList<D> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
            snapshots: 0,
        }
    }

    pub fn items(&self) -> &[D] {
        &self.items
    }

    /// True until the first event, success or failure, has been applied.
    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of snapshots applied so far.
    pub fn snapshots(&self) -> u64 {
        self.snapshots
    }

    /// Apply one event from the stream.
    pub fn apply(&mut self, event: Result<Vec<D>>) -> LiveUpdate {
        let first = self.loading;
        self.loading = false;

        match event {
            Ok(items) => {
                let mut seen = HashSet::with_capacity(items.len());
                self.items = items
                    .into_iter()
                    .filter(|item| seen.insert(item.id().clone()))
                    .collect();
                self.error = None;
                self.snapshots += 1;
                debug!(count = self.items.len(), "{} snapshot applied", D::KIND);
                if first {
                    LiveUpdate::Loaded
                } else {
                    LiveUpdate::Refreshed
                }
            }
            Err(err) => {
                warn!(error = %err, "{} snapshot stream failed", D::KIND);
                self.error = Some(err.user_message());
                LiveUpdate::Failed
            }
        }
    }
}

impl<D: Document> Default for LiveList<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`LiveList`] together with the subscription that feeds it.
///
/// Dropping the feed, or calling [`close`](Self::close), releases the
/// subscription.
pub struct LiveFeed<D: Document> {
    list: LiveList<D>,
    stream: Option<Pin<Box<dyn Snapshots<D>>>>,
}

impl<D: Document> LiveFeed<D> {
    /// Subscribe to `query` on `source`.
    ///
    /// A failed subscription is not returned as an error; it becomes the
    /// feed's first event so the list leaves its loading state.
    pub fn subscribe<S>(source: &S, query: &LiveQuery<D>) -> Self
    where
        S: SnapshotSource<D>,
        S::Snapshots: 'static,
    {
        debug!(query = %query.describe(), "subscribing");
        match source.subscribe(query) {
            Ok(stream) => Self::from_stream(stream),
            Err(err) => {
                let mut list = LiveList::new();
                list.apply(Err(err));
                Self { list, stream: None }
            }
        }
    }

    /// Wrap an existing snapshot stream.
    pub fn from_stream(stream: impl Snapshots<D> + 'static) -> Self {
        Self {
            list: LiveList::new(),
            stream: Some(Box::pin(stream)),
        }
    }

    pub fn list(&self) -> &LiveList<D> {
        &self.list
    }

    /// Returns true while the subscription is held.
    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Wait for the next event and apply it.
    ///
    /// Returns `None` once the stream has ended or the feed was closed.
    pub async fn next(&mut self) -> Option<LiveUpdate> {
        let stream = self.stream.as_mut()?;
        match stream.next().await {
            Some(event) => Some(self.list.apply(event)),
            None => {
                debug!("{} snapshot stream ended", D::KIND);
                self.stream = None;
                None
            }
        }
    }

    /// Release the subscription. The last snapshot stays readable.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            debug!("{} subscription released", D::KIND);
        }
    }
}
