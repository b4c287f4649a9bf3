//! Opaque continuation cursor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque token marking a position in an ordered result sequence.
///
/// A cursor is handed out by a data source as part of a page and passed back
/// verbatim to request the following page. Only data sources create cursors
/// or look inside them; everything else treats them as black boxes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a data-source specific continuation token.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token. Intended for data source implementations.
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
