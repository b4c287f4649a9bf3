//! Profile store trait.

use async_trait::async_trait;

use crate::Result;
use crate::profile::{Principal, Profile, ProfileUpdate};
use crate::types::UserId;

/// Reads and writes user profiles.
///
/// Both required operations act on the principal's own profile. The `_of`
/// variants accept a target id from outside and refuse anything but the
/// principal's own.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the principal's profile.
    async fn get_profile(&self, principal: &Principal) -> Result<Profile>;

    /// Merge a validated update into the principal's profile and return the
    /// stored result.
    async fn update_profile(&self, principal: &Principal, update: &ProfileUpdate)
    -> Result<Profile>;

    /// Fetch `user`'s profile on behalf of `principal`.
    async fn get_profile_of(&self, principal: &Principal, user: &UserId) -> Result<Profile> {
        principal.ensure_owns(user)?;
        self.get_profile(principal).await
    }

    /// Update `user`'s profile on behalf of `principal`.
    async fn update_profile_of(
        &self,
        principal: &Principal,
        user: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile> {
        principal.ensure_owns(user)?;
        self.update_profile(principal, update).await
    }
}
