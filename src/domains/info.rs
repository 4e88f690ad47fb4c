use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Dated;
use crate::error::AppError;

/// How a contact answered an info request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseGrade {
    Positive,
    Neutral,
    Negative,
}

impl ResponseGrade {
    pub const ALL: [ResponseGrade; 3] = [
        ResponseGrade::Positive,
        ResponseGrade::Neutral,
        ResponseGrade::Negative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseGrade::Positive => "positive",
            ResponseGrade::Neutral => "neutral",
            ResponseGrade::Negative => "negative",
        }
    }
}

impl fmt::Display for ResponseGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResponseGrade {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(ResponseGrade::Positive),
            "neutral" => Ok(ResponseGrade::Neutral),
            "negative" => Ok(ResponseGrade::Negative),
            other => Err(AppError::Validation(format!("Unknown response grade: {}", other))),
        }
    }
}

/// A follow-up logged against a networking contact.
///
/// `contact_name` is copied from the contact when the follow-up is written
/// and never refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoContact {
    #[serde(default)]
    pub id: String,
    pub owner_id: String,
    pub networking_id: String,
    pub contact_name: String,
    pub response: ResponseGrade,
    #[serde(default)]
    pub remarks: String,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

impl Dated for InfoContact {
    fn date(&self) -> &str {
        &self.date
    }
}

/// Validated input of the Info form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInfoContact {
    pub networking_id: String,
    pub response: ResponseGrade,
    pub remarks: String,
    pub date: String,
}
