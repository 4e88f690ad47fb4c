// Local auth provider - credential store over the document store, argon2
// password hashes, identity-change notifications over a watch channel

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{info, instrument, warn};

use crate::core::{Collection, DocumentId, IdentityKey};
use crate::error::{AppError, AppResult};
use crate::infrastructure::document::{to_fields, Fields, Filter};
use crate::infrastructure::traits::{AuthProvider, DocumentStore, Identity};

/// Shortest password the provider accepts
pub const PROVIDER_MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredential {
    #[serde(default)]
    id: String,
    email: String,
    password_hash: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl StoredCredential {
    fn identity(&self) -> Identity {
        Identity {
            key: IdentityKey::new(self.id.clone()),
            email: self.email.clone(),
        }
    }
}

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

// Argon2 runs on the blocking pool
async fn hash_password_blocking(password: &str) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
}

async fn verify_password_blocking(password: &str, hash: &str) -> AppResult<bool> {
    let (password, hash) = (password.to_string(), hash.to_string());
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
}

/// Auth provider that keeps credentials in the `auth_identities` collection.
/// Holds at most one current identity, like a client SDK does.
pub struct LocalAuthProvider {
    store: Arc<dyn DocumentStore>,
    current: watch::Sender<Option<Identity>>,
    email_pattern: Regex,
    // Held from the duplicate-email check until the credential is written
    registration: Mutex<()>,
}

impl LocalAuthProvider {
    pub fn new(store: Arc<dyn DocumentStore>) -> AppResult<Self> {
        let email_pattern = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .map_err(|e| AppError::Internal(format!("Invalid email pattern: {}", e)))?;
        let (current, _) = watch::channel(None);
        Ok(Self {
            store,
            current,
            email_pattern,
            registration: Mutex::new(()),
        })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<StoredCredential>> {
        let docs = self
            .store
            .query(Collection::AuthIdentities, &[Filter::eq("email", email)])
            .await?;
        docs.first().map(|doc| doc.decode()).transpose()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    #[instrument(skip(self, password))]
    async fn create_identity(&self, email: &str, password: &str) -> AppResult<Identity> {
        let email = normalize_email(email);
        if !self.email_pattern.is_match(&email) {
            return Err(AppError::AuthCreationError(format!("Invalid email address: {}", email)));
        }
        if password.chars().count() < PROVIDER_MIN_PASSWORD_LENGTH {
            return Err(AppError::AuthCreationError(format!(
                "Password must be at least {} characters",
                PROVIDER_MIN_PASSWORD_LENGTH
            )));
        }

        let _registration = self.registration.lock().await;
        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::AuthCreationError(format!(
                "Email already registered: {}",
                email
            )));
        }

        let key = IdentityKey::generate();
        let credential = StoredCredential {
            id: key.to_string(),
            email: email.clone(),
            password_hash: hash_password_blocking(password).await?,
            created_at: chrono::Utc::now(),
        };
        self.store
            .put(Collection::AuthIdentities, &DocumentId::from(&key), to_fields(&credential)?)
            .await?;

        let identity = credential.identity();
        info!("Created identity {} for {}", identity.key, identity.email);
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Identity> {
        let email = normalize_email(email);
        let credential = self
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid credentials".to_string()))?;

        if !verify_password_blocking(password, &credential.password_hash).await? {
            warn!("Failed sign-in for {}", email);
            return Err(AppError::AuthError("Invalid credentials".to_string()));
        }

        let identity = credential.identity();
        info!("Signed in {}", identity.key);
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> AppResult<()> {
        if let Some(previous) = self.current.send_replace(None) {
            info!("Signed out {}", previous.key);
        }
        Ok(())
    }

    #[instrument(skip(self, new_password))]
    async fn change_password(&self, new_password: &str) -> AppResult<()> {
        let identity = self
            .current_identity()
            .ok_or_else(|| AppError::AuthError("No signed-in identity".to_string()))?;
        if new_password.chars().count() < PROVIDER_MIN_PASSWORD_LENGTH {
            return Err(AppError::AuthError(format!(
                "Password must be at least {} characters",
                PROVIDER_MIN_PASSWORD_LENGTH
            )));
        }

        let mut fields = Fields::new();
        fields.insert(
            "password_hash".to_string(),
            serde_json::Value::String(hash_password_blocking(new_password).await?),
        );
        self.store
            .update(Collection::AuthIdentities, &DocumentId::from(&identity.key), fields)
            .await?;
        info!("Changed password for {}", identity.key);
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        let mut receiver = self.current.subscribe();
        receiver.mark_changed();
        receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_store::MemoryDocumentStore;

    fn provider() -> LocalAuthProvider {
        LocalAuthProvider::new(Arc::new(MemoryDocumentStore::new())).unwrap()
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_sign_in_yields_created_identity() {
        let auth = provider();
        let created = auth.create_identity("Jane@X.com", "hunter22").await.unwrap();
        assert_eq!(created.email, "jane@x.com");
        assert_eq!(auth.current_identity(), Some(created.clone()));

        auth.sign_out().await.unwrap();
        assert_eq!(auth.current_identity(), None);

        let signed_in = auth.sign_in("jane@x.com", "hunter22").await.unwrap();
        assert_eq!(signed_in.key, created.key);
    }

    #[tokio::test]
    async fn test_create_identity_rejects_duplicate_and_malformed_email() {
        let auth = provider();
        auth.create_identity("jane@x.com", "hunter22").await.unwrap();

        let duplicate = auth.create_identity("JANE@x.com", "another1").await;
        assert!(matches!(duplicate, Err(AppError::AuthCreationError(_))));

        let malformed = auth.create_identity("not-an-email", "hunter22").await;
        assert!(matches!(malformed, Err(AppError::AuthCreationError(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registration_of_one_email() {
        let store = Arc::new(MemoryDocumentStore::new());
        let auth = Arc::new(LocalAuthProvider::new(store.clone()).unwrap());

        let attempts: Vec<_> = (0..4)
            .map(|_| {
                let auth = auth.clone();
                tokio::spawn(async move { auth.create_identity("jane@x.com", "hunter22").await })
            })
            .collect();
        let mut created = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert!(matches!(e, AppError::AuthCreationError(_))),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.len(Collection::AuthIdentities).await, 1);
    }

    #[tokio::test]
    async fn test_blocking_helpers_agree_with_hasher() {
        let hash = hash_password_blocking("secret1").await.unwrap();
        assert!(verify_password_blocking("secret1", &hash).await.unwrap());
        assert!(!verify_password_blocking("secret2", &hash).await.unwrap());
        assert!(verify_password("secret1", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_wrong_password_is_auth_error() {
        let auth = provider();
        auth.create_identity("jane@x.com", "hunter22").await.unwrap();
        auth.sign_out().await.unwrap();

        let result = auth.sign_in("jane@x.com", "wrong-password").await;
        assert!(matches!(result, Err(AppError::AuthError(_))));
        let unknown = auth.sign_in("nobody@x.com", "hunter22").await;
        assert!(matches!(unknown, Err(AppError::AuthError(_))));
        assert_eq!(auth.current_identity(), None);
    }

    #[tokio::test]
    async fn test_change_password() {
        let auth = provider();
        let no_session = auth.change_password("newpass1").await;
        assert!(matches!(no_session, Err(AppError::AuthError(_))));

        auth.create_identity("jane@x.com", "hunter22").await.unwrap();
        let too_short = auth.change_password("abc").await;
        assert!(matches!(too_short, Err(AppError::AuthError(_))));

        auth.change_password("newpass1").await.unwrap();
        auth.sign_out().await.unwrap();
        assert!(auth.sign_in("jane@x.com", "hunter22").await.is_err());
        assert!(auth.sign_in("jane@x.com", "newpass1").await.is_ok());
    }

    #[tokio::test]
    async fn test_subscribe_sees_changes() {
        let auth = provider();
        let mut rx = auth.subscribe();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), None);

        let identity = auth.create_identity("jane@x.com", "hunter22").await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Some(identity));

        auth.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), None);
    }
}
