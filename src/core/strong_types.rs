// Strong Types - newtypes for the opaque keys that cross the auth and
// document-store boundaries

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque key assigned by the auth provider to an identity.
///
/// Doubles as the owner identifier on every record and as the key of the
/// identity's profile document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Fresh key for a newly created identity
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for IdentityKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for IdentityKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<IdentityKey> for String {
    fn from(key: IdentityKey) -> Self {
        key.0
    }
}

/// Key of a document inside one collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Store-assigned key for append-only inserts
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&IdentityKey> for DocumentId {
    fn from(key: &IdentityKey) -> Self {
        Self(key.0.clone())
    }
}

/// Named document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Profile documents keyed by identity key
    Users,
    Networking,
    Info,
    /// Credentials held by the local auth provider
    AuthIdentities,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Networking => "networking",
            Collection::Info => "info",
            Collection::AuthIdentities => "auth_identities",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_are_unique() {
        let a = IdentityKey::generate();
        let b = IdentityKey::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert_ne!(DocumentId::generate(), DocumentId::generate());
    }

    #[test]
    fn test_identity_key_serializes_as_plain_string() {
        let key = IdentityKey::new("abc123");
        assert_eq!(serde_json::to_value(&key).unwrap(), serde_json::json!("abc123"));
        assert_eq!(DocumentId::from(&key).as_str(), "abc123");
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::Users.to_string(), "users");
        assert_eq!(Collection::AuthIdentities.as_str(), "auth_identities");
    }
}
