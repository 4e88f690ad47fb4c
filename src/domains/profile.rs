use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile document mirrored by the session; keyed by the identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}
