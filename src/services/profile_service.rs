// ProfileService - profile documents in the `users` collection plus the
// password-change passthrough to the auth provider

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::core::{Collection, DocumentId, IdentityKey};
use crate::domains::UserProfile;
use crate::error::{AppError, AppResult};
use crate::infrastructure::document::to_fields;
use crate::infrastructure::traits::{AuthProvider, DocumentStore, Identity};

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { store, auth }
    }

    pub async fn get(&self, key: &IdentityKey) -> AppResult<Option<UserProfile>> {
        self.store
            .get(Collection::Users, &DocumentId::from(key))
            .await?
            .map(|doc| doc.decode())
            .transpose()
    }

    /// Write the profile for a freshly created identity. The key never changes
    /// afterwards and a second profile for the same identity is refused.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        identity: &Identity,
        name: &str,
        email: &str,
        phone: &str,
    ) -> AppResult<UserProfile> {
        if self.get(&identity.key).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Profile already exists for {}",
                identity.key
            )));
        }

        let profile = UserProfile {
            id: identity.key.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            created_at: Utc::now(),
        };
        self.store
            .put(Collection::Users, &DocumentId::from(&identity.key), to_fields(&profile)?)
            .await?;
        info!("Created profile for {}", identity.key);
        Ok(profile)
    }

    pub async fn change_password(&self, new_password: &str) -> AppResult<()> {
        self.auth.change_password(new_password).await
    }
}
