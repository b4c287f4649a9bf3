//! Core shopfront types.
//!
//! Identifiers and cursors enforce their invariants at construction time.
//! Field values and sort orders are shared by every document kind.

mod cursor;
mod field;
mod id;

pub use cursor::Cursor;
pub use field::{Direction, FieldSelector, FieldValue, Sort, SortValue, collate};
pub use id::{ItemId, UserId};
