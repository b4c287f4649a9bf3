//! User profiles and the principal they are bound to.
//!
//! Token verification happens outside this crate. Whatever verified the
//! caller constructs a [`Principal`]; from then on every profile read or
//! write is bound to that principal's own user id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AuthError, Error, ValidationError};
use crate::types::UserId;

const DISPLAY_NAME_MAX: usize = 100;
const BIO_MAX: usize = 500;
const LOCATION_MAX: usize = 100;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user: UserId,
}

impl Principal {
    /// Wrap an identity that has already been verified.
    pub fn authenticated(user: UserId) -> Self {
        Self { user }
    }

    /// The principal's user id.
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Refuse access to any user's resource but the principal's own.
    ///
    /// Use this wherever a user id arrives from outside (a path segment, a
    /// command line argument) rather than from the principal itself.
    pub fn ensure_owns(&self, resource: &UserId) -> Result<(), AuthError> {
        if &self.user != resource {
            return Err(AuthError::NotOwner {
                principal: self.user.to_string(),
                resource: resource.to_string(),
            });
        }
        Ok(())
    }
}

/// A stored user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// An empty profile for `id`.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            display_name: None,
            bio: None,
            avatar_url: None,
            location: None,
            website: None,
            updated_at: None,
        }
    }

    /// Merge an update: fields present in the update replace stored ones,
    /// absent fields are left alone.
    pub fn apply(&mut self, update: &ProfileUpdate, now: DateTime<Utc>) {
        if let Some(v) = &update.display_name {
            self.display_name = Some(v.clone());
        }
        if let Some(v) = &update.bio {
            self.bio = Some(v.clone());
        }
        if let Some(v) = &update.avatar_url {
            self.avatar_url = Some(v.clone());
        }
        if let Some(v) = &update.location {
            self.location = Some(v.clone());
        }
        if let Some(v) = &update.website {
            self.website = Some(v.clone());
        }
        self.updated_at = Some(now);
    }
}

/// A partial profile update. Every field is optional; unknown keys are
/// rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl ProfileUpdate {
    /// Parse and validate a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty body, invalid JSON, unknown
    /// keys, a field that breaks its limits, or an update with no fields.
    pub fn from_json(body: &str) -> Result<Self, Error> {
        if body.trim().is_empty() {
            return Err(ValidationError::Field {
                field: "body",
                reason: "request body is empty".to_string(),
            }
            .into());
        }

        let update: Self = serde_json::from_str(body).map_err(|e| ValidationError::Field {
            field: "body",
            reason: e.to_string(),
        })?;
        update.validate()?;
        Ok(update)
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
            && self.location.is_none()
            && self.website.is_none()
    }

    /// Check every present field against its limits.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }

        if let Some(name) = &self.display_name {
            check_length("displayName", name, 1, DISPLAY_NAME_MAX)?;
        }
        if let Some(bio) = &self.bio {
            check_length("bio", bio, 0, BIO_MAX)?;
        }
        if let Some(location) = &self.location {
            check_length("location", location, 0, LOCATION_MAX)?;
        }
        if let Some(url) = &self.avatar_url {
            check_url("avatarUrl", url)?;
        }
        if let Some(url) = &self.website {
            check_url("website", url)?;
        }

        Ok(())
    }
}

fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::Field {
            field,
            reason: format!("must be at least {} characters", min),
        });
    }
    if len > max {
        return Err(ValidationError::Field {
            field,
            reason: format!("must be at most {} characters", max),
        });
    }
    Ok(())
}

fn check_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let url = Url::parse(value).map_err(|e| ValidationError::Field {
        field,
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::Field {
            field,
            reason: "must be an http or https URL".to_string(),
        });
    }

    Ok(())
}
