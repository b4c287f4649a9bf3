//! Paged list controller.
//!
//! [`ListState`] is the synchronous state machine: it hands out [`Ticket`]s
//! for the requests it wants made and accepts their completions.
//! [`Controller`] pairs it with a [`DataSource`](crate::traits::DataSource)
//! and runs the requests.

mod driver;
mod state;

pub use driver::{Controller, ListSnapshot};
pub use state::{FetchKind, ListState, Outcome, Status, Ticket};
