//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{DateTime, TimeZone, Utc};

use crate::{
    application::use_cases::waitlist::SignupInput,
    domain::entities::waitlist_user::{DEFAULT_AGE, DEFAULT_GENDER, WaitlistUser},
};

/// Create a stored waitlist user with sensible defaults.
pub fn create_test_user(overrides: impl FnOnce(&mut WaitlistUser)) -> WaitlistUser {
    let mut user = WaitlistUser {
        id: 1,
        name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        phone: "555-0100".to_string(),
        gender: DEFAULT_GENDER.to_string(),
        age: DEFAULT_AGE.to_string(),
        created_at: test_datetime(),
        ip_address: Some("203.0.113.7".to_string()),
        user_agent: Some("test-agent/1.0".to_string()),
    };
    overrides(&mut user);
    user
}

/// Raw signup input with only the required fields set.
pub fn signup_input(name: &str, email: &str, phone: &str) -> SignupInput {
    SignupInput {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
        gender: None,
        age: None,
    }
}

/// Fixed timestamp for reproducible tests.
pub fn test_datetime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
}

/// Fixed timestamp offset by the given number of minutes.
pub fn test_datetime_offset_minutes(minutes: i64) -> DateTime<Utc> {
    test_datetime() + chrono::Duration::minutes(minutes)
}
