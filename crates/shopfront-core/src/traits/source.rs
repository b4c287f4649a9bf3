//! Paged data source trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::catalog::{Document, Page, PageQuery};

/// Something that can serve one page of documents at a time.
///
/// Implementations signal the end of a listing by returning a page shorter
/// than `query.limit` or no next cursor.
#[async_trait]
pub trait DataSource<D: Document>: Send + Sync {
    /// Fetch the page described by `query`.
    async fn fetch_page(&self, query: &PageQuery<D>) -> Result<Page<D>>;
}

#[async_trait]
impl<D, T> DataSource<D> for Arc<T>
where
    D: Document,
    T: DataSource<D> + ?Sized,
{
    async fn fetch_page(&self, query: &PageQuery<D>) -> Result<Page<D>> {
        (**self).fetch_page(query).await
    }
}
