//! shopfront-file - Filesystem-backed catalog and profile store.
//!
//! Documents live as one JSON file each under
//! `collections/<collection>/<id>.json`, profiles under `users/<id>.json`.
//! Every write appends a line to `changes.jsonl`, which live subscriptions
//! watch.

mod catalog;
mod profiles;
mod seed;
mod snapshots;
mod store;

pub use catalog::FileCatalog;
pub use profiles::FileProfiles;
pub use seed::{SeedSummary, sample_posts, sample_products, seed};
pub use snapshots::FileSnapshots;
pub use store::{ChangeEvent, ChangeOp, FileStore};
