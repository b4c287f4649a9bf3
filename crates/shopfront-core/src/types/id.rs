//! Document and user identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ValidationError};

/// Maximum identifier length in bytes.
const MAX_ID_BYTES: usize = 1500;

fn validate(s: &str) -> Result<(), ValidationError> {
    let reject = |reason: &str| ValidationError::Id {
        value: s.to_string(),
        reason: reason.to_string(),
    };

    if s.is_empty() {
        return Err(reject("cannot be empty"));
    }

    if s.len() > MAX_ID_BYTES {
        return Err(reject("exceeds maximum length of 1500 bytes"));
    }

    if s == "." || s == ".." {
        return Err(reject("cannot be '.' or '..'"));
    }

    if s.contains('/') || s.contains('\\') {
        return Err(reject("cannot contain path separators"));
    }

    // Reserved by document databases for internal ids.
    if s.len() >= 4 && s.starts_with("__") && s.ends_with("__") {
        return Err(reject("cannot match the reserved form __*__"));
    }

    Ok(())
}

/// A validated, opaque document identifier.
///
/// # Example
///
/// ```
/// use shopfront_core::ItemId;
///
/// let id = ItemId::new("wireless-headphones").unwrap();
/// assert_eq!(id.as_str(), "wireless-headphones");
/// assert!(ItemId::new("a/b").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Create a new id, validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, too long, contains a path
    /// separator, or uses a reserved form.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a user who owns a profile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a new user id, validating it with the same rules as [`ItemId`].
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}
