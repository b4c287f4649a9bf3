//! shopfront-core - Catalog types, list controllers and data source traits.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod live;
pub mod profile;
pub mod traits;
pub mod types;
pub mod view;

pub use catalog::{
    Constraint, Criteria, Document, FilterConfig, LiveQuery, Page, PageQuery, Post, PostField,
    Product, ProductField, RawDocument,
};
pub use config::ControllerConfig;
pub use controller::{Controller, ListSnapshot, ListState, Outcome, Status};
pub use debounce::{Debouncer, debounced};
pub use error::Error;
pub use live::{LiveFeed, LiveList, LiveUpdate};
pub use profile::{Principal, Profile, ProfileUpdate};
pub use traits::{DataSource, ProfileStore, SnapshotSource, Snapshots};
pub use types::{Cursor, Direction, ItemId, Sort, SortValue, UserId};
pub use view::LocalView;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
