//! Catalog documents, filters and query descriptions.
//!
//! The types here describe *what* to list. Fetching is done through the
//! traits in [`traits`](crate::traits); holding and paging results is the job
//! of [`controller`](crate::controller) and [`view`](crate::view).

mod document;
mod filter;
mod post;
mod product;
mod query;

pub use document::{Document, RawDocument};
pub use filter::{ALL_CATEGORIES, FilterConfig};
pub use post::{PUBLISHED_STATUS, Post, PostField};
pub use product::{PRICE_CURRENCY, Product, ProductField};
pub use query::{Constraint, Criteria, LiveQuery, Page, PageQuery};
