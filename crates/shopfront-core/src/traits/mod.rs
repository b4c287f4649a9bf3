//! Boundary traits implemented by data sources.

mod profiles;
mod snapshots;
mod source;

pub use profiles::ProfileStore;
pub use snapshots::{SnapshotSource, Snapshots};
pub use source::DataSource;
