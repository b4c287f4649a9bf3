//! File-backed profile store.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};

use shopfront_core::Result;
use shopfront_core::error::NotFoundError;
use shopfront_core::profile::{Principal, Profile, ProfileUpdate};
use shopfront_core::traits::ProfileStore;

use crate::store::FileStore;

/// Profiles stored as `users/<id>.json`.
#[derive(Debug, Clone)]
pub struct FileProfiles {
    store: FileStore,
}

impl FileProfiles {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProfileStore for FileProfiles {
    #[instrument(skip(self, principal), fields(user = %principal.user()))]
    async fn get_profile(&self, principal: &Principal) -> Result<Profile> {
        self.store
            .read_profile(principal.user())?
            .ok_or_else(|| NotFoundError::new("profile", principal.user().as_str()).into())
    }

    #[instrument(skip(self, principal, update), fields(user = %principal.user()))]
    async fn update_profile(
        &self,
        principal: &Principal,
        update: &ProfileUpdate,
    ) -> Result<Profile> {
        update.validate()?;

        let mut profile = self
            .store
            .read_profile(principal.user())?
            .unwrap_or_else(|| Profile::new(principal.user().clone()));
        profile.apply(update, Utc::now());
        self.store.write_profile(&profile)?;

        debug!("updated profile");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_core::error::Error;
    use shopfront_core::types::UserId;
    use tempfile::TempDir;

    fn principal(id: &str) -> Principal {
        Principal::authenticated(UserId::new(id).unwrap())
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let dir = TempDir::new().unwrap();
        let profiles = FileProfiles::new(FileStore::new(dir.path()));
        assert!(matches!(
            profiles.get_profile(&principal("alice")).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn updates_merge() {
        let dir = TempDir::new().unwrap();
        let profiles = FileProfiles::new(FileStore::new(dir.path()));
        let alice = principal("alice");

        let update = ProfileUpdate::from_json(r#"{"displayName":"Alice"}"#).unwrap();
        profiles.update_profile(&alice, &update).await.unwrap();
        let update = ProfileUpdate::from_json(r#"{"bio":"Rustacean"}"#).unwrap();
        profiles.update_profile(&alice, &update).await.unwrap();

        let stored = profiles.get_profile(&alice).await.unwrap();
        assert_eq!(stored.display_name.as_deref(), Some("Alice"));
        assert_eq!(stored.bio.as_deref(), Some("Rustacean"));
        assert!(stored.updated_at.is_some());
    }

    #[tokio::test]
    async fn other_users_profile_refused() {
        let dir = TempDir::new().unwrap();
        let profiles = FileProfiles::new(FileStore::new(dir.path()));
        let alice = principal("alice");
        let bob = UserId::new("bob").unwrap();

        let update = ProfileUpdate {
            bio: Some("hijacked".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            profiles.update_profile_of(&alice, &bob, &update).await,
            Err(Error::Auth(_))
        ));
        assert!(matches!(
            profiles.get_profile_of(&alice, &bob).await,
            Err(Error::Auth(_))
        ));
        assert!(FileStore::new(dir.path()).read_profile(&bob).unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_update_not_stored() {
        let dir = TempDir::new().unwrap();
        let profiles = FileProfiles::new(FileStore::new(dir.path()));
        let alice = principal("alice");

        let update = ProfileUpdate {
            website: Some("javascript:alert(1)".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            profiles.update_profile(&alice, &update).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            profiles.get_profile(&alice).await,
            Err(Error::NotFound(_))
        ));
    }
}
