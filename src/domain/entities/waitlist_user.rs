use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_GENDER: &str = "prefer-not-to-say";
pub const DEFAULT_AGE: &str = "not-specified";
pub const UNKNOWN_USER_AGENT: &str = "unknown";

/// One signup row as stored in `waitlist_users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub age: String,
    pub created_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A validated signup ready to be written. Optional fields already carry their
/// sentinel defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWaitlistUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub age: String,
    pub ip_address: Option<String>,
    pub user_agent: String,
}
