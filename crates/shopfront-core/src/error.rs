//! Error types for shopfront.
//!
//! A single [`Error`] type with explicit variants for request failures,
//! input validation, missing data, undecodable documents and access checks.

use std::fmt;
use thiserror::Error;

/// The unified error type for shopfront operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The data source could not serve the request (IO, backend, stream).
    #[error("request failed: {0}")]
    Request(#[from] RequestError),

    /// Input was rejected before any request was issued.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Nothing exists behind the referenced identifier.
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// A fetched document could not be turned into a typed item.
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// The principal may not act on the referenced resource.
    #[error("access denied: {0}")]
    Auth(#[from] AuthError),
}

impl Error {
    /// Returns true if repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Request(_))
    }

    /// A message suitable for showing to an end user.
    ///
    /// Controllers store this instead of the error itself so that no failure
    /// from the data source ever escapes into the rendering path.
    pub fn user_message(&self) -> String {
        match self {
            Error::Request(_) => {
                format!("Could not load results ({self}). Please try again.")
            }
            Error::Validation(err) => err.to_string(),
            Error::NotFound(err) => err.to_string(),
            Error::Decode(_) => "Some results could not be read.".to_string(),
            Error::Auth(_) => "You are not allowed to do that.".to_string(),
        }
    }
}

/// Failures talking to the data source.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Local IO failed.
    #[error("IO error: {message}")]
    Io { message: String },

    /// The backend rejected or failed the request.
    #[error("backend error: {message}")]
    Backend { message: String },

    /// A live subscription could not be established or broke.
    #[error("subscription error: {message}")]
    Subscription { message: String },
}

impl From<std::io::Error> for RequestError {
    fn from(err: std::io::Error) -> Self {
        RequestError::Io {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Request(RequestError::from(err))
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Invalid document identifier.
    #[error("invalid id '{value}': {reason}")]
    Id { value: String, reason: String },

    /// A numeric bound could not be parsed or is out of range.
    #[error("invalid {bound} price '{value}': {reason}")]
    Bound {
        bound: &'static str,
        value: String,
        reason: String,
    },

    /// The minimum bound is greater than the maximum bound.
    #[error("minimum {min} is greater than maximum {max}")]
    InvertedRange { min: f64, max: f64 },

    /// The document kind has no numeric field to filter on.
    #[error("{collection} cannot be filtered by a numeric range")]
    NoRangeField { collection: &'static str },

    /// The field is not one the document kind can sort or filter by.
    #[error("unknown field '{value}' for {collection}")]
    UnknownField {
        collection: &'static str,
        value: String,
    },

    /// The sort direction is neither ascending nor descending.
    #[error("unknown sort direction '{value}'")]
    Direction { value: String },

    /// A profile field failed its constraints.
    #[error("invalid {field}: {reason}")]
    Field { field: &'static str, reason: String },

    /// An update carried no fields at all.
    #[error("update must include at least one field")]
    EmptyUpdate,
}

/// Nothing exists behind an identifier.
#[derive(Debug)]
pub struct NotFoundError {
    /// What kind of thing was looked up ("product", "profile").
    pub kind: &'static str,
    /// The identifier that was looked up.
    pub id: String,
}

impl NotFoundError {
    /// Create a new not-found error.
    pub fn new(kind: &'static str, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' does not exist", self.kind, self.id)
    }
}

impl std::error::Error for NotFoundError {}

/// A document that cannot be decoded at all.
///
/// Individual malformed fields never produce this; they are coerced.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The document body is not a JSON object.
    #[error("document '{id}' is not an object")]
    NotAnObject { id: String },

    /// The document has no usable identifier.
    #[error("document has an invalid id: {reason}")]
    InvalidId { reason: String },

    /// The stored bytes are not JSON.
    #[error("document '{id}' is not valid JSON: {reason}")]
    Json { id: String, reason: String },
}

/// Access check failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The principal tried to act on a resource it does not own.
    #[error("principal '{principal}' cannot access '{resource}'")]
    NotOwner { principal: String, resource: String },
}
