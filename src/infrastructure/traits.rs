// Boundaries to the hosted collaborators: the auth provider and the document
// database. Everything above this layer talks to them through these traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::core::{Collection, DocumentId, IdentityKey};
use crate::error::AppResult;
use crate::infrastructure::document::{Document, Fields, Filter};

/// An authenticated identity as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub key: IdentityKey,
    pub email: String,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an identity and make it the current session.
    /// Fails with `AuthCreationError` for a duplicate or malformed email.
    async fn create_identity(&self, email: &str, password: &str) -> AppResult<Identity>;

    /// Verify credentials and make the identity current. Fails with `AuthError`.
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Identity>;

    /// Terminate the current session, if any.
    async fn sign_out(&self) -> AppResult<()>;

    /// Replace the password of the current identity.
    async fn change_password(&self, new_password: &str) -> AppResult<()>;

    fn current_identity(&self) -> Option<Identity>;

    /// Identity-change notifications. The receiver starts with the current
    /// value marked as unseen.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append a document under a store-assigned key
    async fn insert(&self, collection: Collection, fields: Fields) -> AppResult<DocumentId>;

    /// Write a document under a caller-chosen key, replacing any previous one
    async fn put(&self, collection: Collection, id: &DocumentId, fields: Fields) -> AppResult<()>;

    async fn get(&self, collection: Collection, id: &DocumentId) -> AppResult<Option<Document>>;

    /// Documents matching every filter, in insertion order
    async fn query(&self, collection: Collection, filters: &[Filter]) -> AppResult<Vec<Document>>;

    /// Merge fields into an existing document. `NotFound` if it is missing.
    async fn update(&self, collection: Collection, id: &DocumentId, fields: Fields) -> AppResult<()>;
}
