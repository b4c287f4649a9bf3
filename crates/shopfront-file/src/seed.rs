//! Sample catalog data.

use serde_json::{Value, json};
use tracing::info;

use shopfront_core::Result;
use shopfront_core::catalog::{Document, Post, Product};
use shopfront_core::types::ItemId;

use crate::store::FileStore;

/// How many documents [`seed`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub products: usize,
    pub posts: usize,
}

/// Eight products across five categories.
pub fn sample_products() -> Vec<(&'static str, Value)> {
    vec![
        (
            "1",
            json!({
                "name": "Wireless Headphones",
                "sku": "WH-001",
                "description": "Premium noise-cancelling wireless headphones with 30-hour battery life",
                "price": 299.99,
                "stock": 14,
                "category": "Electronics",
                "imageUrl": "/wireless-headphones.png",
                "inStock": true,
                "createdAt": "2024-01-15T00:00:00Z",
            }),
        ),
        (
            "2",
            json!({
                "name": "Smart Watch Pro",
                "sku": "SW-002",
                "description": "Advanced fitness tracking with heart rate monitor and GPS",
                "price": 399.99,
                "stock": 6,
                "category": "Electronics",
                "imageUrl": "/smartwatch-lifestyle.png",
                "inStock": true,
                "createdAt": "2024-01-14T00:00:00Z",
            }),
        ),
        (
            "3",
            json!({
                "name": "Organic Cotton T-Shirt",
                "sku": "CT-003",
                "description": "Comfortable and sustainable everyday wear",
                "price": 29.99,
                "stock": 120,
                "category": "Clothing",
                "imageUrl": "/cotton-tshirt.png",
                "inStock": true,
                "createdAt": "2024-01-13T00:00:00Z",
            }),
        ),
        (
            "4",
            json!({
                "name": "Running Shoes",
                "sku": "RS-004",
                "description": "Lightweight performance running shoes with responsive cushioning",
                "price": 129.99,
                "stock": 32,
                "category": "Sports",
                "imageUrl": "/running-shoes.jpg",
                "inStock": true,
                "createdAt": "2024-01-12T00:00:00Z",
            }),
        ),
        (
            "5",
            json!({
                "name": "Yoga Mat Premium",
                "sku": "YM-005",
                "description": "Extra thick non-slip yoga mat for ultimate comfort",
                "price": 49.99,
                "stock": 0,
                "category": "Sports",
                "imageUrl": "/rolled-yoga-mat.png",
                "inStock": false,
                "createdAt": "2024-01-11T00:00:00Z",
            }),
        ),
        (
            "6",
            json!({
                "name": "Coffee Maker Deluxe",
                "sku": "CM-006",
                "description": "Programmable coffee maker with thermal carafe",
                "price": 89.99,
                "stock": 9,
                "category": "Home & Garden",
                "imageUrl": "/modern-coffee-maker.png",
                "inStock": true,
                "createdAt": "2024-01-10T00:00:00Z",
            }),
        ),
        (
            "7",
            json!({
                "name": "LED Desk Lamp",
                "sku": "DL-007",
                "description": "Adjustable brightness desk lamp with USB charging port",
                "price": 45.99,
                "stock": 41,
                "category": "Home & Garden",
                "imageUrl": "/modern-desk-lamp.png",
                "inStock": true,
                "createdAt": "2024-01-09T00:00:00Z",
            }),
        ),
        (
            "8",
            json!({
                "name": "JavaScript: The Definitive Guide",
                "sku": "BK-008",
                "description": "Comprehensive guide to JavaScript programming",
                "price": 59.99,
                "stock": 17,
                "category": "Books",
                "imageUrl": "/javascript-book.png",
                "inStock": true,
                "createdAt": "2024-01-08T00:00:00Z",
            }),
        ),
    ]
}

/// Blog posts, mostly published, with a couple of drafts.
pub fn sample_posts() -> Vec<(&'static str, Value)> {
    vec![
        (
            "cursor-pagination",
            json!({
                "title": "Cursor pagination without tears",
                "excerpt": "Why offsets drift and cursors do not.",
                "author": "Ada Park",
                "status": "published",
                "createdAt": { "seconds": 1706745600, "nanoseconds": 0 },
            }),
        ),
        (
            "debounced-search",
            json!({
                "title": "Debounced search boxes",
                "excerpt": "Three hundred milliseconds is plenty.",
                "author": "Ravi Shah",
                "status": "published",
                "createdAt": { "seconds": 1706400000, "nanoseconds": 0 },
            }),
        ),
        (
            "stale-responses",
            json!({
                "title": "Dropping stale responses",
                "excerpt": "Sequence numbers beat cancellation.",
                "author": "Ada Park",
                "status": "published",
                "createdAt": { "seconds": 1706054400, "nanoseconds": 0 },
            }),
        ),
        (
            "live-lists",
            json!({
                "title": "Live lists from snapshots",
                "excerpt": "Replace, do not patch.",
                "author": "Mina Cho",
                "status": "draft",
                "createdAt": { "seconds": 1706832000, "nanoseconds": 0 },
            }),
        ),
        (
            "category-filters",
            json!({
                "title": "Category filters that compose",
                "excerpt": "Equality first, then ranges.",
                "author": "Ravi Shah",
                "status": "published",
                "createdAt": { "seconds": 1705708800, "nanoseconds": 0 },
            }),
        ),
        (
            "index-planning",
            json!({
                "title": "Planning composite indexes",
                "excerpt": "Work in progress.",
                "author": "Mina Cho",
                "status": "draft",
                "createdAt": { "seconds": 1705363200, "nanoseconds": 0 },
            }),
        ),
    ]
}

/// Write the sample products and posts into `store`, replacing documents
/// with the same ids.
pub fn seed(store: &FileStore) -> Result<SeedSummary> {
    let products = write_all(store, Product::COLLECTION, sample_products())?;
    let posts = write_all(store, Post::COLLECTION, sample_posts())?;

    info!(products, posts, root = %store.root().display(), "seeded store");
    Ok(SeedSummary { products, posts })
}

fn write_all(store: &FileStore, collection: &str, documents: Vec<(&str, Value)>) -> Result<usize> {
    let count = documents.len();
    for (id, data) in documents {
        store.put_document(collection, &ItemId::new(id)?, &data)?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FileCatalog;
    use shopfront_core::catalog::{Criteria, FilterConfig, PageQuery, RawDocument};
    use shopfront_core::traits::DataSource;
    use tempfile::TempDir;

    #[test]
    fn samples_decode() {
        for (id, data) in sample_products() {
            let raw = RawDocument::new(id, data).unwrap();
            Product::decode(&raw).unwrap();
        }
        for (id, data) in sample_posts() {
            let raw = RawDocument::new(id, data).unwrap();
            Post::decode(&raw).unwrap();
        }
    }

    #[tokio::test]
    async fn seeded_store_serves_pages() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let summary = seed(&store).unwrap();
        assert_eq!(summary, SeedSummary { products: 8, posts: 6 });

        let products: FileCatalog<Product> = FileCatalog::new(store.clone());
        assert_eq!(
            products.categories().unwrap(),
            ["Books", "Clothing", "Electronics", "Home & Garden", "Sports"]
        );

        let sports: Criteria<Product> =
            Criteria::new(FilterConfig::default().with_category("Sports"), Product::default_sort());
        let page = products
            .fetch_page(&PageQuery::first(sports, 20))
            .await
            .unwrap();
        let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Running Shoes", "Yoga Mat Premium"]);

        let posts: FileCatalog<Post> = FileCatalog::new(store);
        let feed = posts
            .fetch_page(&PageQuery::first(Post::published_feed(), 20))
            .await
            .unwrap();
        assert_eq!(feed.items.len(), 4);
        assert_eq!(feed.items[0].id.as_str(), "cursor-pagination");
    }
}
