//! Async driver for [`ListState`].

use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::catalog::{Criteria, Document, FilterConfig};
use crate::config::ControllerConfig;
use crate::error::ValidationError;
use crate::traits::DataSource;
use crate::types::Sort;

use super::state::{ListState, Outcome, Status, Ticket};

/// A copy of the list as it stood at one moment.
#[derive(Debug, Clone)]
pub struct ListSnapshot<D: Document> {
    pub items: Vec<D>,
    pub status: Status,
    pub error: Option<String>,
    pub has_more: bool,
    pub criteria: Criteria<D>,
}

/// Drives a [`ListState`] against a [`DataSource`].
///
/// All methods take `&self`, so one controller can be shared between tasks.
/// The state lock is never held while a request is in flight; when requests
/// overlap, only the most recently issued one is applied.
pub struct Controller<D: Document, S> {
    source: S,
    state: Mutex<ListState<D>>,
}

impl<D, S> Controller<D, S>
where
    D: Document,
    S: DataSource<D>,
{
    /// Create a controller. Nothing is fetched until [`refresh`](Self::refresh)
    /// or a criteria change.
    pub fn new(source: S, criteria: Criteria<D>, page_size: usize) -> Self {
        Self {
            source,
            state: Mutex::new(ListState::new(criteria, page_size)),
        }
    }

    /// Create a controller with the page size from `config`.
    pub fn with_config(source: S, criteria: Criteria<D>, config: &ControllerConfig) -> Self {
        Self::new(source, criteria, config.page_size)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load the first page of the current criteria.
    pub async fn refresh(&self) -> Outcome {
        let ticket = self.state.lock().await.reload();
        self.run(ticket).await
    }

    /// Replace the filter and load the first page.
    ///
    /// # Errors
    ///
    /// Returns an error, without touching the list, if the filter cannot be
    /// applied to this document kind.
    pub async fn set_filter(&self, filter: FilterConfig) -> Result<Outcome, ValidationError> {
        filter.check_for::<D>()?;
        let ticket = self.state.lock().await.set_filter(filter);
        Ok(self.run(ticket).await)
    }

    /// Parse raw filter input and apply it.
    pub async fn apply_filter_input(
        &self,
        category: Option<&str>,
        min: Option<&str>,
        max: Option<&str>,
    ) -> Result<Outcome, ValidationError> {
        let filter = FilterConfig::parse(category, min, max)?;
        self.set_filter(filter).await
    }

    /// Replace the sort and load the first page.
    pub async fn set_sort(&self, sort: Sort<D::Field>) -> Outcome {
        let ticket = self.state.lock().await.set_sort(sort);
        self.run(ticket).await
    }

    /// Sort by `field`, flipping the direction if it is already the sort
    /// field.
    pub async fn toggle_sort(&self, field: D::Field) -> Outcome {
        let ticket = {
            let mut state = self.state.lock().await;
            let sort = state.criteria().sort.toggled(field);
            state.set_sort(sort)
        };
        self.run(ticket).await
    }

    /// Commit a search term and load the first page.
    pub async fn set_search(&self, term: &str) -> Outcome {
        let ticket = self.state.lock().await.set_search(term);
        self.run(ticket).await
    }

    /// Load the next page.
    ///
    /// Returns `None` when there was nothing to do: a request is already in
    /// flight, the list is in the error state, or there are no more pages.
    pub async fn load_more(&self) -> Option<Outcome> {
        let ticket = self.state.lock().await.load_more()?;
        Some(self.run(ticket).await)
    }

    /// Re-issue the failed request. `None` unless the list is in the error
    /// state.
    pub async fn retry(&self) -> Option<Outcome> {
        let ticket = self.state.lock().await.retry()?;
        Some(self.run(ticket).await)
    }

    /// Copy out the current list.
    pub async fn snapshot(&self) -> ListSnapshot<D> {
        let state = self.state.lock().await;
        ListSnapshot {
            items: state.items().to_vec(),
            status: state.status(),
            error: state.error().map(str::to_string),
            has_more: state.has_more(),
            criteria: state.criteria().clone(),
        }
    }

    #[instrument(skip_all, fields(collection = D::COLLECTION, seq = ticket.seq()))]
    async fn run(&self, ticket: Ticket<D>) -> Outcome {
        debug!(query = %ticket.query().describe(), "fetching page");
        let result = self.source.fetch_page(ticket.query()).await;
        self.state.lock().await.complete(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::Result;
    use crate::catalog::{Page, PageQuery, Post, Product, ProductField, RawDocument};
    use crate::error::RequestError;
    use crate::types::Cursor;

    fn product(id: &str, name: &str) -> Product {
        let raw = RawDocument::new(id, json!({ "name": name })).unwrap();
        Product::decode(&raw).unwrap()
    }

    /// Serves a fixed list in pages, using the offset as the cursor.
    struct VecSource {
        items: Vec<Product>,
        calls: AtomicUsize,
        fail_on: Option<usize>,
    }

    impl VecSource {
        fn new(count: usize) -> Self {
            Self {
                items: (1..=count)
                    .map(|i| product(&i.to_string(), &format!("Item {i}")))
                    .collect(),
                calls: AtomicUsize::new(0),
                fail_on: None,
            }
        }
    }

    #[async_trait]
    impl DataSource<Product> for VecSource {
        async fn fetch_page(&self, query: &PageQuery<Product>) -> Result<Page<Product>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(call) {
                return Err(RequestError::Backend {
                    message: "boom".to_string(),
                }
                .into());
            }

            let start: usize = match &query.cursor {
                Some(cursor) => cursor.token().parse().unwrap(),
                None => 0,
            };
            let end = (start + query.limit).min(self.items.len());
            let next = (end < self.items.len()).then(|| Cursor::from_token(end.to_string()));
            Ok(Page::new(self.items[start..end].to_vec(), next))
        }
    }

    /// Answers each search term after a term-specific delay.
    struct SlowSource;

    #[async_trait]
    impl DataSource<Product> for SlowSource {
        async fn fetch_page(&self, query: &PageQuery<Product>) -> Result<Page<Product>> {
            let term = query.criteria.search.clone().unwrap_or_default();
            let delay = if term == "slow" { 200 } else { 10 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(Page::new(vec![product(&term, &term)], None))
        }
    }

    #[tokio::test]
    async fn pages_through_source() {
        let controller = Controller::new(VecSource::new(5), Criteria::default(), 2);

        assert_eq!(controller.refresh().await, Outcome::Applied { added: 2 });
        assert_eq!(
            controller.load_more().await,
            Some(Outcome::Applied { added: 2 })
        );
        assert_eq!(
            controller.load_more().await,
            Some(Outcome::Applied { added: 1 })
        );
        assert_eq!(controller.load_more().await, None);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.items.len(), 5);
        assert_eq!(snapshot.status, Status::Idle);
        assert!(!snapshot.has_more);
        assert_eq!(controller.source().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failure_then_retry() {
        let mut source = VecSource::new(4);
        source.fail_on = Some(1);
        let controller = Controller::new(source, Criteria::default(), 2);

        controller.refresh().await;
        assert_eq!(controller.load_more().await, Some(Outcome::Failed));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.status, Status::Error);
        assert_eq!(snapshot.items.len(), 2);
        assert!(snapshot.error.is_some());

        // load more from the error state does nothing
        assert_eq!(controller.load_more().await, None);
        assert_eq!(
            controller.retry().await,
            Some(Outcome::Applied { added: 2 })
        );
        assert_eq!(controller.snapshot().await.items.len(), 4);
    }

    #[tokio::test]
    async fn invalid_filter_rejected_before_request() {
        let controller: Controller<Post, _> = Controller::new(NoPosts, Post::published_feed(), 2);
        let err = controller
            .apply_filter_input(Some("published"), Some("1"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::NoRangeField { .. }));
        assert_eq!(controller.snapshot().await.status, Status::LoadingFirst);
    }

    struct NoPosts;

    #[async_trait]
    impl DataSource<Post> for NoPosts {
        async fn fetch_page(&self, _query: &PageQuery<Post>) -> Result<Page<Post>> {
            Ok(Page::new(Vec::new(), None))
        }
    }

    #[tokio::test]
    async fn toggle_sort_flips_direction() {
        let controller = Controller::new(VecSource::new(3), Criteria::default(), 2);
        controller.toggle_sort(ProductField::Price).await;
        assert_eq!(
            controller.snapshot().await.criteria.sort,
            Sort::asc(ProductField::Price)
        );
        controller.toggle_sort(ProductField::Price).await;
        assert_eq!(
            controller.snapshot().await.criteria.sort,
            Sort::desc(ProductField::Price)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn latest_request_wins() {
        let controller = Controller::new(SlowSource, Criteria::default(), 10);

        let (slow, fast) = tokio::join!(controller.set_search("slow"), controller.set_search("fast"));
        assert_eq!(slow, Outcome::Stale);
        assert_eq!(fast, Outcome::Applied { added: 1 });

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].name, "fast");
        assert_eq!(snapshot.criteria.search.as_deref(), Some("fast"));
    }

    #[tokio::test]
    async fn unusable_bounds_never_reach_source() {
        let controller = Controller::new(VecSource::new(3), Criteria::default(), 2);

        for filter in [
            FilterConfig::default().with_range(Some(f64::NAN), None),
            FilterConfig::default().with_range(Some(-5.0), None),
            FilterConfig::default().with_range(None, Some(f64::INFINITY)),
        ] {
            let err = controller.set_filter(filter).await.unwrap_err();
            assert!(matches!(err, ValidationError::Bound { .. }));
        }

        assert_eq!(controller.source().calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.snapshot().await.criteria.filter, FilterConfig::default());
    }

    /// Counts first-page requests and records the search term of each.
    #[derive(Default)]
    struct SearchLog {
        terms: std::sync::Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl DataSource<Product> for SearchLog {
        async fn fetch_page(&self, query: &PageQuery<Product>) -> Result<Page<Product>> {
            assert!(query.cursor.is_none());
            self.terms
                .lock()
                .unwrap()
                .push(query.criteria.search.clone());
            Ok(Page::new(Vec::new(), None))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn keystroke_burst_issues_one_first_page_request() {
        use crate::debounce::debounced;
        use futures_util::StreamExt;
        use tokio::sync::mpsc;

        let controller = Controller::new(SearchLog::default(), Criteria::default(), 10);
        let (tx, rx) = mpsc::channel(16);

        let typist = tokio::spawn(async move {
            for prefix in ["l", "la", "lam", "lamp"] {
                tx.send(prefix.to_string()).await.unwrap();
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            tokio::time::sleep(Duration::from_millis(400)).await;
        });

        let mut terms = std::pin::pin!(debounced(rx, Duration::from_millis(300)));
        while let Some(term) = terms.next().await {
            controller.set_search(&term).await;
        }
        typist.await.unwrap();

        let terms = controller.source().terms.lock().unwrap().clone();
        assert_eq!(terms, [Some("lamp".to_string())]);
        assert_eq!(
            controller.snapshot().await.criteria.search.as_deref(),
            Some("lamp")
        );
    }
}
