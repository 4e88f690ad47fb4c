use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Dated;

/// Placeholder name written on skip records
pub const SKIP_PLACEHOLDER_NAME: &str = "Skipped";
/// Placeholder details written on skip records
pub const SKIP_PLACEHOLDER_DETAILS: &str = "-";

/// A networking contact, or a skip record standing in for a declined one.
///
/// `skip_reason` is always present when `skip` is `Some(true)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkingContact {
    #[serde(default)]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub details: String,
    #[serde(default)]
    pub remarks: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NetworkingContact {
    pub fn is_skipped(&self) -> bool {
        self.skip == Some(true)
    }
}

impl Dated for NetworkingContact {
    fn date(&self) -> &str {
        &self.date
    }
}

/// Validated input of the Networking form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNetworkingContact {
    pub name: String,
    pub details: String,
    pub remarks: String,
    pub date: String,
}
