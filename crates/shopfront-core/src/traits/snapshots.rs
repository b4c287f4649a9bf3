//! Live snapshot subscription traits.

use futures_core::Stream;

use crate::Result;
use crate::catalog::{Document, LiveQuery};

/// A stream of complete, ordered result sets.
///
/// Every item replaces the previous one; there are no deltas.
pub trait Snapshots<D>: Stream<Item = Result<Vec<D>>> + Send {}

impl<D, T> Snapshots<D> for T where T: Stream<Item = Result<Vec<D>>> + Send {}

/// Something that can stream snapshots for a query.
pub trait SnapshotSource<D: Document>: Send + Sync {
    /// Snapshot stream type for this source.
    type Snapshots: Snapshots<D>;

    /// Subscribe to `query`. Dropping the returned stream releases the
    /// subscription.
    fn subscribe(&self, query: &LiveQuery<D>) -> Result<Self::Snapshots>;
}
