//! Paged queries over a collection on disk.

use std::cmp::Ordering;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use shopfront_core::Result;
use shopfront_core::catalog::{Constraint, Criteria, Document, LiveQuery, Page, PageQuery};
use shopfront_core::error::{Error, ValidationError};
use shopfront_core::traits::{DataSource, SnapshotSource};
use shopfront_core::types::{Cursor, FieldValue, ItemId, Sort, SortValue, collate};

use crate::snapshots::FileSnapshots;
use crate::store::FileStore;

/// Position of the last item of a page: its sort key and id.
#[derive(Debug, Serialize, Deserialize)]
struct CursorKey {
    key: SortValue,
    id: String,
}

impl CursorKey {
    fn encode(&self) -> Result<Cursor> {
        let token = serde_json::to_string(self).map_err(|e| invalid_cursor(e.to_string()))?;
        Ok(Cursor::from_token(token))
    }

    fn decode(cursor: &Cursor) -> Result<Self> {
        serde_json::from_str(cursor.token()).map_err(|e| invalid_cursor(e.to_string()))
    }
}

fn invalid_cursor(reason: String) -> Error {
    ValidationError::Field {
        field: "cursor",
        reason,
    }
    .into()
}

/// Order by the sort field, then by id, both in the sort direction.
fn order<F: Copy>(sort: &Sort<F>, a: (FieldValue<'_>, &str), b: (FieldValue<'_>, &str)) -> Ordering {
    let ordering = a.0.compare(&b.0).then_with(|| a.1.cmp(b.1));
    sort.direction.apply(ordering)
}

/// A typed view of one collection in a [`FileStore`].
///
/// Every query scans the whole collection. Documents that fail to decode
/// are skipped with a warning.
#[derive(Debug)]
pub struct FileCatalog<D> {
    store: FileStore,
    _kind: PhantomData<fn() -> D>,
}

impl<D> Clone for FileCatalog<D> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _kind: PhantomData,
        }
    }
}

impl<D: Document> FileCatalog<D> {
    pub fn new(store: FileStore) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Every decodable document in the collection, in file name order.
    pub fn documents(&self) -> Result<Vec<D>> {
        let documents = self
            .store
            .scan(D::COLLECTION)?
            .iter()
            .filter_map(|raw| match D::decode(raw) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!(collection = D::COLLECTION, id = raw.id(), error = %e, "skipping undecodable document");
                    None
                }
            })
            .collect();
        Ok(documents)
    }

    /// Read and decode one document.
    pub fn get(&self, id: &ItemId) -> Result<D> {
        let raw = self.store.get_document(D::COLLECTION, id)?;
        Ok(D::decode(&raw)?)
    }

    /// Store a document body under `id`.
    pub fn put(&self, id: &ItemId, data: &Value) -> Result<()> {
        self.store.put_document(D::COLLECTION, id, data)
    }

    /// Distinct values of the category field, in collation order.
    pub fn categories(&self) -> Result<Vec<String>> {
        let mut categories: Vec<String> = Vec::new();
        for doc in self.documents()? {
            if let Some(text) = doc.value(D::CATEGORY_FIELD).as_text()
                && !text.is_empty()
                && !categories.iter().any(|c| c == text)
            {
                categories.push(text.to_string());
            }
        }
        categories.sort_by(|a, b| collate(a, b));
        Ok(categories)
    }

    /// Run a query description against the collection.
    ///
    /// Filter constraints are applied first, then the ordering, then the
    /// cursor and the limit. The next cursor is only set when more
    /// documents follow the page.
    pub fn execute(&self, constraints: &[Constraint<D::Field>]) -> Result<Page<D>> {
        let mut documents = self.documents()?;
        let mut sort = D::default_sort();
        let mut after = None;
        let mut limit = None;

        for constraint in constraints {
            match constraint {
                Constraint::OrderBy(s) => sort = *s,
                Constraint::StartAfter(cursor) => after = Some(CursorKey::decode(cursor)?),
                Constraint::Limit(n) => limit = Some(*n),
                filter => documents.retain(|doc| filter.admits(doc)),
            }
        }

        documents.sort_by(|a, b| {
            order(
                &sort,
                (a.value(sort.field), a.id().as_str()),
                (b.value(sort.field), b.id().as_str()),
            )
        });

        let start = match &after {
            Some(key) => documents
                .iter()
                .position(|doc| {
                    order(
                        &sort,
                        (doc.value(sort.field), doc.id().as_str()),
                        (key.key.as_field(), key.id.as_str()),
                    ) == Ordering::Greater
                })
                .unwrap_or(documents.len()),
            None => 0,
        };

        let total = documents.len();
        let limit = limit.unwrap_or(total);
        let end = start.saturating_add(limit).min(total);
        let items: Vec<D> = documents.drain(start..end).collect();

        let next = match items.last() {
            Some(last) if end < total => Some(
                CursorKey {
                    key: last.value(sort.field).to_owned_value(),
                    id: last.id().to_string(),
                }
                .encode()?,
            ),
            _ => None,
        };

        Ok(Page::new(items, next))
    }

    /// Every document passing `criteria`, in its sort order.
    pub fn matching(&self, criteria: &Criteria<D>) -> Result<Vec<D>> {
        Ok(self.execute(&criteria.constraints())?.items)
    }
}

#[async_trait]
impl<D: Document> DataSource<D> for FileCatalog<D> {
    #[instrument(skip(self, query), fields(collection = D::COLLECTION))]
    async fn fetch_page(&self, query: &PageQuery<D>) -> Result<Page<D>> {
        let page = self.execute(&query.constraints())?;
        debug!(
            count = page.items.len(),
            more = page.next.is_some(),
            "served page"
        );
        Ok(page)
    }
}

impl<D: Document> SnapshotSource<D> for FileCatalog<D> {
    type Snapshots = FileSnapshots<D>;

    fn subscribe(&self, query: &LiveQuery<D>) -> Result<Self::Snapshots> {
        FileSnapshots::watch(self.clone(), query.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shopfront_core::catalog::{FilterConfig, Post, Product, ProductField};
    use shopfront_core::types::Direction;
    use tempfile::TempDir;

    fn catalog() -> (TempDir, FileCatalog<Product>) {
        let dir = TempDir::new().unwrap();
        let catalog = FileCatalog::new(FileStore::new(dir.path()));
        let rows = [
            ("1", "Headphones", "Electronics", 299.99, "2024-01-15T00:00:00Z"),
            ("2", "Watch", "Electronics", 399.99, "2024-01-14T00:00:00Z"),
            ("3", "T-Shirt", "Clothing", 29.99, "2024-01-13T00:00:00Z"),
            ("4", "Shoes", "Sports", 129.99, "2024-01-12T00:00:00Z"),
            ("5", "Yoga Mat", "Sports", 49.99, "2024-01-12T00:00:00Z"),
        ];
        for (id, name, category, price, created) in rows {
            catalog
                .put(
                    &ItemId::new(id).unwrap(),
                    &json!({ "name": name, "category": category, "price": price, "createdAt": created }),
                )
                .unwrap();
        }
        (dir, catalog)
    }

    fn ids(items: &[Product]) -> Vec<&str> {
        items.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn pages_resume_after_cursor() {
        let (_dir, catalog) = catalog();
        let criteria: Criteria<Product> = Criteria::default();

        let first = catalog
            .fetch_page(&PageQuery::first(criteria.clone(), 2))
            .await
            .unwrap();
        assert_eq!(ids(&first.items), ["1", "2"]);
        assert!(first.has_more(2));

        let second = catalog
            .fetch_page(&PageQuery::after(criteria.clone(), first.next.unwrap(), 2))
            .await
            .unwrap();
        // equal createdAt: id breaks the tie, descending
        assert_eq!(ids(&second.items), ["3", "5"]);

        let third = catalog
            .fetch_page(&PageQuery::after(criteria, second.next.unwrap(), 2))
            .await
            .unwrap();
        assert_eq!(ids(&third.items), ["4"]);
        assert_eq!(third.next, None);
    }

    #[tokio::test]
    async fn filters_and_sorts() {
        let (_dir, catalog) = catalog();
        let criteria: Criteria<Product> = Criteria::new(
            FilterConfig::default().with_range(Some(40.0), Some(300.0)),
            Sort::new(ProductField::Price, Direction::Asc),
        );
        let page = catalog
            .fetch_page(&PageQuery::first(criteria, 10))
            .await
            .unwrap();
        assert_eq!(ids(&page.items), ["5", "4", "1"]);
        assert_eq!(page.next, None);
    }

    #[test]
    fn cursor_survives_deleted_document() {
        let (_dir, catalog) = catalog();
        let criteria: Criteria<Product> = Criteria::default();
        let first = catalog.execute(&PageQuery::first(criteria.clone(), 2).constraints()).unwrap();

        catalog
            .store()
            .delete_document("products", &ItemId::new("2").unwrap())
            .unwrap();

        let second = catalog
            .execute(&PageQuery::after(criteria, first.next.unwrap(), 2).constraints())
            .unwrap();
        assert_eq!(ids(&second.items), ["3", "5"]);
    }

    #[test]
    fn garbage_cursor_rejected() {
        let (_dir, catalog) = catalog();
        let query: PageQuery<Product> =
            PageQuery::after(Criteria::default(), Cursor::from_token("nope"), 2);
        assert!(matches!(
            catalog.execute(&query.constraints()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn categories_are_distinct() {
        let (_dir, catalog) = catalog();
        assert_eq!(
            catalog.categories().unwrap(),
            ["Clothing", "Electronics", "Sports"]
        );
    }

    #[test]
    fn undecodable_documents_skipped() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store
            .put_document("posts", &ItemId::new("ok").unwrap(), &json!({ "title": "Fine" }))
            .unwrap();
        std::fs::write(dir.path().join("collections/posts/__bad__.json"), "{}").unwrap();

        let posts: FileCatalog<Post> = FileCatalog::new(store);
        let documents = posts.documents().unwrap();
        assert_eq!(documents.len(), 1);
    }
}
