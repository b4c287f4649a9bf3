//! Client-side filtering, sorting and paging over a resident item set.

use crate::catalog::{Criteria, Document, FilterConfig};
use crate::types::Sort;

/// Filter and sort a slice without touching it.
///
/// The sort is stable, so items that compare equal keep their input order.
pub fn filter_and_sort<'a, D: Document>(items: &'a [D], criteria: &Criteria<D>) -> Vec<&'a D> {
    let constraints = criteria.constraints();
    let mut rows: Vec<&D> = items
        .iter()
        .filter(|doc| constraints.iter().all(|c| c.admits(*doc)))
        .collect();
    rows.sort_by(|a, b| criteria.compare(a, b));
    rows
}

/// A locally held list with its own search, filter, sort and page.
#[derive(Debug, Clone)]
pub struct LocalView<D: Document> {
    items: Vec<D>,
    criteria: Criteria<D>,
    page: usize,
    per_page: usize,
}

impl<D: Document> LocalView<D> {
    pub fn new(items: Vec<D>, per_page: usize) -> Self {
        Self::with_criteria(items, Criteria::default(), per_page)
    }

    pub fn with_criteria(items: Vec<D>, criteria: Criteria<D>, per_page: usize) -> Self {
        Self {
            items,
            criteria,
            page: 1,
            per_page: per_page.max(1),
        }
    }

    /// The held items, in their original order.
    pub fn items(&self) -> &[D] {
        &self.items
    }

    /// Swap in a new item set, keeping search, filter, sort and page.
    pub fn replace_items(&mut self, items: Vec<D>) {
        self.items = items;
    }

    pub fn criteria(&self) -> &Criteria<D> {
        &self.criteria
    }

    /// Commit a search term and go back to the first page.
    pub fn set_search(&mut self, term: &str) {
        self.criteria.set_search(term);
        self.page = 1;
    }

    /// Replace the filter and go back to the first page.
    pub fn set_filter(&mut self, filter: FilterConfig) {
        self.criteria.filter = filter;
        self.page = 1;
    }

    /// Replace the sort and go back to the first page.
    pub fn set_sort(&mut self, sort: Sort<D::Field>) {
        self.criteria.sort = sort;
        self.page = 1;
    }

    /// Sort by `field`, flipping direction if it is already the sort field.
    pub fn sort_by(&mut self, field: D::Field) {
        let sort = self.criteria.sort.toggled(field);
        self.set_sort(sort);
    }

    /// Go to a 1-based page. Out of range pages are clamped when read.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// The current page, clamped to the pages that exist.
    pub fn current_page(&self) -> usize {
        self.page.min(self.page_count())
    }

    /// Every row passing search and filter, in sort order.
    pub fn rows(&self) -> Vec<&D> {
        filter_and_sort(&self.items, &self.criteria)
    }

    /// Number of pages. An empty result still has one (empty) page.
    pub fn page_count(&self) -> usize {
        self.rows().len().div_ceil(self.per_page).max(1)
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> Vec<&D> {
        let rows = self.rows();
        let pages = rows.len().div_ceil(self.per_page).max(1);
        let start = (self.page.min(pages) - 1) * self.per_page;
        rows.into_iter().skip(start).take(self.per_page).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Product, ProductField, RawDocument};
    use crate::types::Direction;
    use serde_json::json;

    fn product(id: &str, name: &str, category: &str, price: f64, created: &str) -> Product {
        let raw = RawDocument::new(
            id,
            json!({
                "name": name,
                "sku": format!("SKU-{id}"),
                "category": category,
                "price": price,
                "createdAt": created,
            }),
        )
        .unwrap();
        Product::decode(&raw).unwrap()
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Desk Lamp", "Home", 45.99, "2024-01-10T00:00:00Z"),
            product("2", "apple", "Food", 5.0, "2024-01-12T00:00:00Z"),
            product("3", "Apple", "Food", 20.0, "2024-01-12T00:00:00Z"),
            product("4", "Yoga Mat", "Sports", 1.0, "2024-01-11T00:00:00Z"),
        ]
    }

    fn names<'a>(rows: &[&'a Product]) -> Vec<&'a str> {
        rows.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn sorts_numbers_descending() {
        let mut view = LocalView::new(catalog(), 10);
        view.set_sort(Sort::new(ProductField::Price, Direction::Desc));
        let prices: Vec<f64> = view.rows().iter().map(|p| p.price).collect();
        assert_eq!(prices, [45.99, 20.0, 5.0, 1.0]);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let mut view = LocalView::new(catalog(), 10);
        view.set_sort(Sort::asc(ProductField::CreatedAt));
        assert_eq!(names(&view.rows()), ["Desk Lamp", "Yoga Mat", "apple", "Apple"]);
    }

    #[test]
    fn names_collate_case_insensitively() {
        let mut view = LocalView::new(catalog(), 10);
        view.set_sort(Sort::asc(ProductField::Name));
        assert_eq!(names(&view.rows()), ["apple", "Apple", "Desk Lamp", "Yoga Mat"]);
    }

    #[test]
    fn search_and_filter_combine() {
        let mut view = LocalView::new(catalog(), 10);
        view.set_search("APP");
        view.set_filter(FilterConfig::default().with_range(Some(10.0), None));
        assert_eq!(names(&view.rows()), ["Apple"]);

        view.set_search("sku-4");
        view.set_filter(FilterConfig::default().with_category("Sports"));
        assert_eq!(names(&view.rows()), ["Yoga Mat"]);
    }

    #[test]
    fn sort_change_resets_page() {
        let mut view = LocalView::new(catalog(), 2);
        view.set_page(2);
        assert_eq!(view.current_page(), 2);

        view.sort_by(ProductField::Price);
        assert_eq!(view.current_page(), 1);

        view.set_page(2);
        // same field, flipped direction
        view.sort_by(ProductField::Price);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.criteria().sort, Sort::desc(ProductField::Price));
    }

    #[test]
    fn search_and_filter_changes_reset_page() {
        let mut view = LocalView::new(catalog(), 1);
        view.set_page(3);
        assert_eq!(view.current_page(), 3);

        view.set_search("a");
        assert_eq!(view.current_page(), 1);

        view.set_page(2);
        view.set_filter(FilterConfig::default().with_category("Food"));
        assert_eq!(view.current_page(), 1);
        assert_eq!(names(&view.page_rows()), ["apple"]);
    }

    #[test]
    fn out_of_range_page_clamps() {
        let mut view = LocalView::new(catalog(), 3);
        view.set_page(9);
        assert_eq!(view.page_count(), 2);
        assert_eq!(view.current_page(), 2);
        assert_eq!(view.page_rows().len(), 1);
    }

    #[test]
    fn empty_result_has_one_page() {
        let mut view = LocalView::new(catalog(), 3);
        view.set_search("nothing matches");
        assert_eq!(view.page_count(), 1);
        assert!(view.page_rows().is_empty());
    }

    #[test]
    fn original_order_untouched() {
        let mut view = LocalView::new(catalog(), 10);
        view.set_sort(Sort::desc(ProductField::Price));
        let _ = view.rows();
        let ids: Vec<&str> = view.items().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4"]);
    }
}
