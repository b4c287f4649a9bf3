//! Query descriptions and pages.
//!
//! [`Criteria`] is the part of a listing the user controls (filter, sort,
//! search). A [`PageQuery`] adds a cursor and a limit. Both lower into an
//! ordered list of [`Constraint`]s, which is what a data source executes.

use std::cmp::Ordering;
use std::fmt;

use crate::types::{Cursor, FieldSelector, Sort};

use super::document::Document;
use super::filter::FilterConfig;

/// One step of a query description.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint<F> {
    /// Text field equals a value.
    Equal { field: F, value: String },
    /// Numeric field is at least a value.
    AtLeast { field: F, value: f64 },
    /// Numeric field is at most a value.
    AtMost { field: F, value: f64 },
    /// Either field contains the term, ignoring case.
    Matches { fields: [F; 2], term: String },
    /// Order the results.
    OrderBy(Sort<F>),
    /// Resume strictly after the cursor position.
    StartAfter(Cursor),
    /// Return at most this many results.
    Limit(usize),
}

impl<F: FieldSelector> Constraint<F> {
    /// Returns true if the document passes this constraint.
    ///
    /// Ordering, cursor and limit constraints admit everything.
    pub fn admits<D: Document<Field = F>>(&self, doc: &D) -> bool {
        match self {
            Constraint::Equal { field, value } => {
                doc.value(*field).as_text() == Some(value.as_str())
            }
            Constraint::AtLeast { field, value } => doc
                .value(*field)
                .as_number()
                .is_some_and(|n| n >= *value),
            Constraint::AtMost { field, value } => doc
                .value(*field)
                .as_number()
                .is_some_and(|n| n <= *value),
            Constraint::Matches { fields, term } => {
                let needle = term.to_lowercase();
                fields.iter().any(|field| {
                    doc.value(*field)
                        .as_text()
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
            }
            Constraint::OrderBy(_) | Constraint::StartAfter(_) | Constraint::Limit(_) => true,
        }
    }
}

impl<F: FieldSelector> fmt::Display for Constraint<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Equal { field, value } => {
                write!(f, "where {} == {:?}", field.name(), value)
            }
            Constraint::AtLeast { field, value } => write!(f, "where {} >= {}", field.name(), value),
            Constraint::AtMost { field, value } => write!(f, "where {} <= {}", field.name(), value),
            Constraint::Matches { fields, term } => write!(
                f,
                "where {} or {} contains {:?}",
                fields[0].name(),
                fields[1].name(),
                term
            ),
            Constraint::OrderBy(sort) => write!(f, "order by {}", sort),
            Constraint::StartAfter(_) => write!(f, "start after cursor"),
            Constraint::Limit(n) => write!(f, "limit {}", n),
        }
    }
}

/// What the user asked to see: filter, sort and committed search term.
#[derive(Debug, Clone)]
pub struct Criteria<D: Document> {
    pub filter: FilterConfig,
    pub sort: Sort<D::Field>,
    /// Committed search term. Never empty when present.
    pub search: Option<String>,
}

impl<D: Document> Criteria<D> {
    pub fn new(filter: FilterConfig, sort: Sort<D::Field>) -> Self {
        Self {
            filter,
            sort,
            search: None,
        }
    }

    /// Replace the search term. Blank terms clear the search.
    pub fn with_search(mut self, term: impl AsRef<str>) -> Self {
        self.set_search(term);
        self
    }

    /// Replace the search term in place. Blank terms clear the search.
    pub fn set_search(&mut self, term: impl AsRef<str>) {
        let term = term.as_ref().trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
    }

    /// Filter and search constraints, in execution order, followed by the
    /// ordering.
    pub fn constraints(&self) -> Vec<Constraint<D::Field>> {
        let mut constraints = Vec::new();

        if let Some(category) = &self.filter.category {
            constraints.push(Constraint::Equal {
                field: D::CATEGORY_FIELD,
                value: category.clone(),
            });
        }

        if let Some(field) = D::RANGE_FIELD {
            if let Some(min) = self.filter.min {
                constraints.push(Constraint::AtLeast { field, value: min });
            }
            if let Some(max) = self.filter.max {
                constraints.push(Constraint::AtMost { field, value: max });
            }
        }

        if let Some(term) = &self.search {
            constraints.push(Constraint::Matches {
                fields: D::SEARCH_FIELDS,
                term: term.clone(),
            });
        }

        constraints.push(Constraint::OrderBy(self.sort));
        constraints
    }

    /// Returns true if the document passes every filter and the search.
    pub fn admits(&self, doc: &D) -> bool {
        self.constraints().iter().all(|c| c.admits(doc))
    }

    /// Compare two documents in this criteria's sort order.
    pub fn compare(&self, a: &D, b: &D) -> Ordering {
        let ordering = a.value(self.sort.field).compare(&b.value(self.sort.field));
        self.sort.direction.apply(ordering)
    }
}

impl<D: Document> Default for Criteria<D> {
    fn default() -> Self {
        Self::new(FilterConfig::default(), D::default_sort())
    }
}

impl<D: Document> PartialEq for Criteria<D> {
    fn eq(&self, other: &Self) -> bool {
        self.filter == other.filter && self.sort == other.sort && self.search == other.search
    }
}

/// A request for one page of results.
#[derive(Debug, Clone)]
pub struct PageQuery<D: Document> {
    pub criteria: Criteria<D>,
    /// Position to resume after; `None` starts at the beginning.
    pub cursor: Option<Cursor>,
    /// Page size.
    pub limit: usize,
}

impl<D: Document> PageQuery<D> {
    /// A query for the first page.
    pub fn first(criteria: Criteria<D>, limit: usize) -> Self {
        Self {
            criteria,
            cursor: None,
            limit,
        }
    }

    /// A query resuming after `cursor`.
    pub fn after(criteria: Criteria<D>, cursor: Cursor, limit: usize) -> Self {
        Self {
            criteria,
            cursor: Some(cursor),
            limit,
        }
    }

    /// The full query description.
    pub fn constraints(&self) -> Vec<Constraint<D::Field>> {
        let mut constraints = self.criteria.constraints();
        if let Some(cursor) = &self.cursor {
            constraints.push(Constraint::StartAfter(cursor.clone()));
        }
        constraints.push(Constraint::Limit(self.limit));
        constraints
    }

    /// One-line rendering of the query description.
    pub fn describe(&self) -> String {
        describe(D::COLLECTION, &self.constraints())
    }
}

/// A request for a live stream of snapshots.
#[derive(Debug, Clone)]
pub struct LiveQuery<D: Document> {
    pub criteria: Criteria<D>,
    /// Maximum number of documents per snapshot.
    pub limit: usize,
}

impl<D: Document> LiveQuery<D> {
    pub fn new(criteria: Criteria<D>, limit: usize) -> Self {
        Self { criteria, limit }
    }

    /// The full query description.
    pub fn constraints(&self) -> Vec<Constraint<D::Field>> {
        let mut constraints = self.criteria.constraints();
        constraints.push(Constraint::Limit(self.limit));
        constraints
    }

    /// One-line rendering of the query description.
    pub fn describe(&self) -> String {
        describe(D::COLLECTION, &self.constraints())
    }
}

fn describe<F: FieldSelector>(collection: &str, constraints: &[Constraint<F>]) -> String {
    let mut out = collection.to_string();
    for constraint in constraints {
        out.push_str(", ");
        out.push_str(&constraint.to_string());
    }
    out
}

/// One page of results.
#[derive(Debug, Clone)]
pub struct Page<D> {
    /// The items in this page, in query order.
    pub items: Vec<D>,
    /// Cursor for the next page; `None` when the source has no more.
    pub next: Option<Cursor>,
}

impl<D> Page<D> {
    pub fn new(items: Vec<D>, next: Option<Cursor>) -> Self {
        Self { items, next }
    }

    /// Returns true if another page may follow.
    ///
    /// A page shorter than the requested size is the last one, whatever
    /// cursor the source returned.
    pub fn has_more(&self, page_size: usize) -> bool {
        self.next.is_some() && self.items.len() >= page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Post, PostField, Product, ProductField, RawDocument};
    use crate::types::Direction;
    use serde_json::json;

    fn product(id: &str, name: &str, sku: &str, category: &str, price: f64) -> Product {
        let raw = RawDocument::new(
            id,
            json!({ "name": name, "sku": sku, "category": category, "price": price }),
        )
        .unwrap();
        Product::decode(&raw).unwrap()
    }

    #[test]
    fn constraints_follow_index_order() {
        let criteria: Criteria<Product> = Criteria::new(
            FilterConfig::default()
                .with_category("Sports")
                .with_range(Some(10.0), Some(100.0)),
            Sort::desc(ProductField::CreatedAt),
        )
        .with_search("mat");

        let query = PageQuery::after(criteria, Cursor::from_token("abc"), 20);
        assert_eq!(
            query.describe(),
            "products, where category == \"Sports\", where price >= 10, \
             where price <= 100, where name or sku contains \"mat\", \
             order by createdAt desc, start after cursor, limit 20"
        );
    }

    #[test]
    fn first_page_has_no_cursor_constraint() {
        let query = PageQuery::first(Post::published_feed(), 10);
        let constraints = query.constraints();
        assert!(
            !constraints
                .iter()
                .any(|c| matches!(c, Constraint::StartAfter(_)))
        );
        assert_eq!(
            constraints.first(),
            Some(&Constraint::Equal {
                field: PostField::Status,
                value: "published".to_string()
            })
        );
        assert_eq!(constraints.last(), Some(&Constraint::Limit(10)));
    }

    #[test]
    fn blank_search_clears_term() {
        let criteria: Criteria<Product> = Criteria::default().with_search("   ");
        assert_eq!(criteria.search, None);
    }

    #[test]
    fn admits_checks_every_filter() {
        let criteria: Criteria<Product> = Criteria::new(
            FilterConfig::default()
                .with_category("Sports")
                .with_range(Some(40.0), Some(130.0)),
            Sort::asc(ProductField::Name),
        );

        assert!(criteria.admits(&product("4", "Running Shoes", "RS-1", "Sports", 129.99)));
        assert!(!criteria.admits(&product("5", "Yoga Mat", "YM-1", "Sports", 30.0)));
        assert!(!criteria.admits(&product("6", "Lamp", "LD-1", "Home", 45.99)));
    }

    #[test]
    fn search_is_case_insensitive_on_both_fields() {
        let criteria: Criteria<Product> = Criteria::default().with_search("wh-0");
        assert!(criteria.admits(&product("1", "Headphones", "WH-001", "E", 1.0)));
        let criteria: Criteria<Product> = Criteria::default().with_search("HEAD");
        assert!(criteria.admits(&product("1", "Headphones", "WH-001", "E", 1.0)));
        assert!(!criteria.admits(&product("2", "Lamp", "LD-001", "E", 1.0)));
    }

    #[test]
    fn compare_applies_direction() {
        let criteria: Criteria<Product> =
            Criteria::new(FilterConfig::default(), Sort::new(ProductField::Price, Direction::Desc));
        let cheap = product("1", "a", "a", "c", 1.0);
        let dear = product("2", "b", "b", "c", 2.0);
        assert_eq!(criteria.compare(&cheap, &dear), Ordering::Greater);
    }

    #[test]
    fn short_page_has_no_more() {
        let page: Page<u8> = Page::new(vec![1, 2], Some(Cursor::from_token("x")));
        assert!(!page.has_more(3));
        assert!(page.has_more(2));
        let page: Page<u8> = Page::new(vec![1, 2, 3], None);
        assert!(!page.has_more(3));
    }
}
