//! Synchronous list state machine.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use crate::Result;
use crate::catalog::{Criteria, Document, FilterConfig, Page, PageQuery};
use crate::types::{Cursor, ItemId, Sort};

/// Where a list is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The first page of the current criteria is in flight.
    LoadingFirst,
    /// Nothing is in flight.
    Idle,
    /// A follow-up page is in flight.
    LoadingMore,
    /// The last request failed.
    Error,
}

impl Status {
    /// Returns true while a request is in flight.
    pub fn is_loading(self) -> bool {
        matches!(self, Status::LoadingFirst | Status::LoadingMore)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::LoadingFirst => "loading",
            Status::Idle => "idle",
            Status::LoadingMore => "loading more",
            Status::Error => "error",
        };
        f.write_str(s)
    }
}

/// Which kind of page a ticket asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    First,
    More,
}

/// A request the state machine wants made.
///
/// Hand the ticket back to [`ListState::complete`] together with the result.
#[derive(Debug, Clone)]
pub struct Ticket<D: Document> {
    seq: u64,
    kind: FetchKind,
    query: PageQuery<D>,
}

impl<D: Document> Ticket<D> {
    /// Sequence number; only the most recently issued ticket is applied.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    /// The page to fetch.
    pub fn query(&self) -> &PageQuery<D> {
        &self.query
    }
}

/// What a completion did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The page was appended. `added` excludes duplicates.
    Applied { added: usize },
    /// The request failed and the list is in the error state.
    Failed,
    /// A newer request was issued since; the result was dropped.
    Stale,
}

/// The list of items shown for one set of criteria, plus its load status.
///
/// Every change of filter, sort or search (and every reload) clears the
/// list and returns a ticket for the first page. Follow-up pages are only
/// requested from [`Status::Idle`] when the source reported more.
#[derive(Debug, Clone)]
pub struct ListState<D: Document> {
    criteria: Criteria<D>,
    page_size: usize,
    items: Vec<D>,
    seen: HashSet<ItemId>,
    cursor: Option<Cursor>,
    has_more: bool,
    status: Status,
    error: Option<String>,
    failed: Option<FetchKind>,
    issued: u64,
}

impl<D: Document> ListState<D> {
    /// A list waiting for its first page. Call [`reload`](Self::reload) to
    /// get the ticket for it.
    pub fn new(criteria: Criteria<D>, page_size: usize) -> Self {
        Self {
            criteria,
            page_size: page_size.max(1),
            items: Vec::new(),
            seen: HashSet::new(),
            cursor: None,
            has_more: false,
            status: Status::LoadingFirst,
            error: None,
            failed: None,
            issued: 0,
        }
    }

    pub fn items(&self) -> &[D] {
        &self.items
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// User-facing message for the last failure.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true if a follow-up page can be requested.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn criteria(&self) -> &Criteria<D> {
        &self.criteria
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Start over with the current criteria.
    pub fn reload(&mut self) -> Ticket<D> {
        self.reset();
        self.issue(FetchKind::First)
    }

    /// Replace all criteria at once.
    pub fn set_criteria(&mut self, criteria: Criteria<D>) -> Ticket<D> {
        self.criteria = criteria;
        self.reload()
    }

    /// Replace the filter. Sort and search are kept.
    pub fn set_filter(&mut self, filter: FilterConfig) -> Ticket<D> {
        self.criteria.filter = filter;
        self.reload()
    }

    /// Replace the sort. Filter and search are kept.
    pub fn set_sort(&mut self, sort: Sort<D::Field>) -> Ticket<D> {
        self.criteria.sort = sort;
        self.reload()
    }

    /// Commit a search term. A blank term clears the search.
    pub fn set_search(&mut self, term: &str) -> Ticket<D> {
        self.criteria.set_search(term);
        self.reload()
    }

    /// Ask for the next page.
    ///
    /// Returns `None` (and changes nothing) unless the list is idle and the
    /// source reported more pages.
    pub fn load_more(&mut self) -> Option<Ticket<D>> {
        if self.status != Status::Idle || !self.has_more {
            return None;
        }
        let ticket = self.issue(FetchKind::More);
        // issue() leaves the cursor alone; a More ticket without one is a bug
        debug_assert!(ticket.query.cursor.is_some());
        Some(ticket)
    }

    /// Re-issue the request that put the list in the error state.
    ///
    /// A failed first page is retried from scratch. A failed follow-up page
    /// is retried with the preserved cursor, keeping the loaded items.
    pub fn retry(&mut self) -> Option<Ticket<D>> {
        if self.status != Status::Error {
            return None;
        }

        match self.failed {
            Some(FetchKind::More) if self.cursor.is_some() => Some(self.issue(FetchKind::More)),
            _ => Some(self.reload()),
        }
    }

    /// Apply the result of a ticket.
    pub fn complete(&mut self, ticket: Ticket<D>, result: Result<Page<D>>) -> Outcome {
        if ticket.seq != self.issued {
            debug!(
                seq = ticket.seq,
                latest = self.issued,
                "discarding stale {} page",
                D::KIND
            );
            return Outcome::Stale;
        }

        match result {
            Ok(page) => {
                self.has_more = page.has_more(self.page_size);
                self.cursor = if self.has_more { page.next } else { None };
                let added = self.append(page.items);
                self.status = Status::Idle;
                self.error = None;
                self.failed = None;
                debug!(
                    added,
                    total = self.items.len(),
                    has_more = self.has_more,
                    "{} page applied",
                    D::KIND
                );
                Outcome::Applied { added }
            }
            Err(err) => {
                warn!(error = %err, kind = ?ticket.kind, "{} page request failed", D::KIND);
                self.status = Status::Error;
                self.error = Some(err.user_message());
                self.failed = Some(ticket.kind);
                Outcome::Failed
            }
        }
    }

    fn reset(&mut self) {
        self.items.clear();
        self.seen.clear();
        self.cursor = None;
        self.has_more = false;
        self.error = None;
        self.failed = None;
    }

    fn issue(&mut self, kind: FetchKind) -> Ticket<D> {
        self.issued += 1;
        self.status = match kind {
            FetchKind::First => Status::LoadingFirst,
            FetchKind::More => Status::LoadingMore,
        };

        let query = match (kind, &self.cursor) {
            (FetchKind::More, Some(cursor)) => {
                PageQuery::after(self.criteria.clone(), cursor.clone(), self.page_size)
            }
            _ => PageQuery::first(self.criteria.clone(), self.page_size),
        };

        Ticket {
            seq: self.issued,
            kind,
            query,
        }
    }

    fn append(&mut self, items: Vec<D>) -> usize {
        let before = self.items.len();
        for item in items {
            if self.seen.insert(item.id().clone()) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }
}
