//! Product documents.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

use super::document::{Document, RawDocument};
use crate::error::DecodeError;
use crate::types::{FieldSelector, FieldValue, ItemId, Sort};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ItemId,
    pub name: String,
    /// Stock keeping unit; the secondary search field.
    pub sku: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    pub image_url: String,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Currency every catalog price is in.
pub const PRICE_CURRENCY: &str = "USD";

impl Product {
    /// schema.org `Product` structured data, for embedding as JSON-LD.
    pub fn schema_org(&self) -> Value {
        let availability = if self.in_stock {
            "https://schema.org/InStock"
        } else {
            "https://schema.org/OutOfStock"
        };

        json!({
            "@context": "https://schema.org",
            "@type": "Product",
            "sku": self.sku,
            "name": self.name,
            "description": self.description,
            "image": self.image_url,
            "category": self.category,
            "offers": {
                "@type": "Offer",
                "price": self.price,
                "priceCurrency": PRICE_CURRENCY,
                "availability": availability,
            },
        })
    }
}

/// Fields a product can be sorted or filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Name,
    Sku,
    Category,
    Price,
    Stock,
    CreatedAt,
    UpdatedAt,
}

impl FieldSelector for ProductField {
    fn all() -> &'static [Self] {
        &[
            ProductField::Name,
            ProductField::Sku,
            ProductField::Category,
            ProductField::Price,
            ProductField::Stock,
            ProductField::CreatedAt,
            ProductField::UpdatedAt,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            ProductField::Name => "name",
            ProductField::Sku => "sku",
            ProductField::Category => "category",
            ProductField::Price => "price",
            ProductField::Stock => "stock",
            ProductField::CreatedAt => "createdAt",
            ProductField::UpdatedAt => "updatedAt",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Document for Product {
    type Field = ProductField;

    const COLLECTION: &'static str = "products";
    const KIND: &'static str = "product";
    const CATEGORY_FIELD: ProductField = ProductField::Category;
    const RANGE_FIELD: Option<ProductField> = Some(ProductField::Price);
    const SEARCH_FIELDS: [ProductField; 2] = [ProductField::Name, ProductField::Sku];

    fn default_sort() -> Sort<ProductField> {
        Sort::desc(ProductField::CreatedAt)
    }

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn value(&self, field: ProductField) -> FieldValue<'_> {
        match field {
            ProductField::Name => FieldValue::Text(&self.name),
            ProductField::Sku => FieldValue::Text(&self.sku),
            ProductField::Category => FieldValue::Text(&self.category),
            ProductField::Price => FieldValue::Number(self.price),
            ProductField::Stock => FieldValue::Number(self.stock as f64),
            ProductField::CreatedAt => FieldValue::Time(self.created_at),
            ProductField::UpdatedAt => FieldValue::Time(self.updated_at),
        }
    }

    fn decode(raw: &RawDocument) -> Result<Self, DecodeError> {
        let created_at = raw.time("createdAt");
        // Documents written before updatedAt existed only carry createdAt.
        let updated_at = if raw.data().contains_key("updatedAt") {
            raw.time("updatedAt")
        } else {
            created_at
        };

        Ok(Self {
            id: raw.item_id()?,
            name: raw.text("name"),
            sku: raw.text("sku"),
            description: raw.text("description"),
            category: raw.text("category"),
            price: raw.number("price"),
            stock: raw.integer("stock"),
            image_url: raw.text("imageUrl"),
            in_stock: raw.flag("inStock", true),
            created_at,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decodes_complete_document() {
        let raw = RawDocument::new(
            "1",
            json!({
                "name": "Wireless Headphones",
                "sku": "WH-001",
                "description": "Premium noise-cancelling wireless headphones",
                "price": 299.99,
                "stock": 14,
                "category": "Electronics",
                "imageUrl": "/wireless-headphones.png",
                "inStock": true,
                "createdAt": "2024-01-15T00:00:00Z"
            }),
        )
        .unwrap();

        let product = Product::decode(&raw).unwrap();
        assert_eq!(product.id.as_str(), "1");
        assert_eq!(product.name, "Wireless Headphones");
        assert_eq!(product.price, 299.99);
        assert_eq!(product.stock, 14);
        assert_eq!(
            product.created_at,
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(product.updated_at, product.created_at);
    }

    #[test]
    fn coerces_malformed_fields() {
        let raw = RawDocument::new(
            "2",
            json!({ "name": null, "price": "abc", "stock": "7", "updatedAt": false }),
        )
        .unwrap();

        let product = Product::decode(&raw).unwrap();
        assert_eq!(product.name, "");
        assert_eq!(product.price, 0.0);
        assert_eq!(product.stock, 7);
        assert!(product.in_stock);
        assert_eq!(product.updated_at, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn field_names_parse() {
        assert_eq!(Product::parse_field("price").unwrap(), ProductField::Price);
        assert_eq!(
            Product::parse_field("createdat").unwrap(),
            ProductField::CreatedAt
        );
        assert!(Product::parse_field("colour").is_err());
    }

    #[test]
    fn serializes_with_wire_names() {
        let raw = RawDocument::new("3", json!({ "name": "Mug", "inStock": false })).unwrap();
        let value = serde_json::to_value(Product::decode(&raw).unwrap()).unwrap();
        assert_eq!(value["id"], "3");
        assert_eq!(value["inStock"], false);
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn schema_org_offer() {
        let raw = RawDocument::new(
            "5",
            json!({ "name": "Yoga Mat Premium", "sku": "YM-005", "price": 49.99, "inStock": false }),
        )
        .unwrap();
        let schema = Product::decode(&raw).unwrap().schema_org();

        assert_eq!(schema["@type"], "Product");
        assert_eq!(schema["name"], "Yoga Mat Premium");
        assert_eq!(schema["offers"]["price"], 49.99);
        assert_eq!(schema["offers"]["priceCurrency"], "USD");
        assert_eq!(
            schema["offers"]["availability"],
            "https://schema.org/OutOfStock"
        );
    }
}
