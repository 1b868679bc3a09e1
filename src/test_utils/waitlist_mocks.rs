//! In-memory mock implementation of the waitlist repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::waitlist::WaitlistRepo,
    domain::entities::{
        analytics::AnalyticsSnapshot,
        waitlist_user::{NewWaitlistUser, WaitlistUser},
    },
};

#[derive(Default)]
struct Store {
    users: Vec<WaitlistUser>,
    next_id: i32,
    total_signups: i64,
    last_updated: Option<DateTime<Utc>>,
}

/// In-memory implementation of `WaitlistRepo` for testing.
///
/// Row insert and counter bump happen under the same lock, mirroring the
/// transactional Postgres implementation. Email uniqueness is enforced there
/// too, so it behaves like the table constraint even when the pre-check is
/// disabled.
#[derive(Default)]
pub struct InMemoryWaitlistRepo {
    store: Mutex<Store>,
    store_calls: AtomicUsize,
    skip_precheck: bool,
    fail_writes: bool,
    unreachable: bool,
}

impl InMemoryWaitlistRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repo with existing rows. The counter starts in sync.
    pub fn with_users(users: Vec<WaitlistUser>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0);
        let total_signups = users.len() as i64;
        Self {
            store: Mutex::new(Store {
                users,
                next_id,
                total_signups,
                last_updated: None,
            }),
            ..Default::default()
        }
    }

    /// Make `email_exists` always report false, leaving duplicates to the
    /// uniqueness check in `create_signup`.
    pub fn without_precheck(mut self) -> Self {
        self.skip_precheck = true;
        self
    }

    /// Make every insert fail with a database error.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Make every call fail as if the store were down.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Get all rows (for test assertions).
    pub fn get_all(&self) -> Vec<WaitlistUser> {
        self.store.lock().unwrap().users.clone()
    }

    pub fn total_signups(&self) -> i64 {
        self.store.lock().unwrap().total_signups
    }

    /// Number of repository calls made so far (excluding `ping`).
    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> AppResult<()> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(AppError::Database("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl WaitlistRepo for InMemoryWaitlistRepo {
    async fn ping(&self) -> AppResult<()> {
        if self.unreachable {
            return Err(AppError::Database("connection refused".into()));
        }
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        self.enter()?;
        if self.skip_precheck {
            return Ok(false);
        }
        Ok(self
            .store
            .lock()
            .unwrap()
            .users
            .iter()
            .any(|u| u.email == email))
    }

    async fn create_signup(&self, signup: &NewWaitlistUser) -> AppResult<i32> {
        self.enter()?;
        if self.fail_writes {
            return Err(AppError::Database("Database operation failed".into()));
        }

        let mut store = self.store.lock().unwrap();
        if store.users.iter().any(|u| u.email == signup.email) {
            return Err(AppError::DuplicateEmail);
        }

        let now = Utc::now();
        store.next_id += 1;
        let id = store.next_id;
        store.users.push(WaitlistUser {
            id,
            name: signup.name.clone(),
            email: signup.email.clone(),
            phone: signup.phone.clone(),
            gender: signup.gender.clone(),
            age: signup.age.clone(),
            created_at: now,
            ip_address: signup.ip_address.clone(),
            user_agent: Some(signup.user_agent.clone()),
        });
        store.total_signups += 1;
        store.last_updated = Some(now);
        Ok(id)
    }

    async fn count(&self) -> AppResult<i64> {
        self.enter()?;
        Ok(self.store.lock().unwrap().users.len() as i64)
    }

    async fn list_recent(&self) -> AppResult<Vec<WaitlistUser>> {
        self.enter()?;
        let mut users = self.store.lock().unwrap().users.clone();
        users.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(users)
    }

    async fn analytics(&self) -> AppResult<AnalyticsSnapshot> {
        self.enter()?;
        let store = self.store.lock().unwrap();
        Ok(AnalyticsSnapshot {
            total_signups: store.total_signups,
            last_updated: store.last_updated,
            row_count: store.users.len() as i64,
        })
    }
}
