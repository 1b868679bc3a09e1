use chrono::{DateTime, Utc};
use serde::Serialize;

/// The single `waitlist_analytics` row next to the live row count, so callers
/// can see whether the denormalized counter has drifted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_signups: i64,
    pub last_updated: Option<DateTime<Utc>>,
    pub row_count: i64,
}

impl AnalyticsSnapshot {
    pub fn is_consistent(&self) -> bool {
        self.total_signups == self.row_count
    }
}
