use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::app_error::{AppError, AppResult};
use crate::application::validators::{
    MAX_NAME_LEN, MAX_PHONE_LEN, MAX_PROFILE_FIELD_LEN, is_valid_email, normalize_email,
    optional_or, required, within_len,
};
use crate::domain::entities::{
    analytics::AnalyticsSnapshot,
    deployment_mode::DeploymentMode,
    waitlist_user::{DEFAULT_AGE, DEFAULT_GENDER, NewWaitlistUser, UNKNOWN_USER_AGENT, WaitlistUser},
};

const MAX_USER_AGENT_LEN: usize = 512;

#[async_trait]
pub trait WaitlistRepo: Send + Sync {
    /// Trivial round trip against the store. Must not touch application tables.
    async fn ping(&self) -> AppResult<()>;
    async fn email_exists(&self, email: &str) -> AppResult<bool>;
    /// Inserts the row and bumps the analytics counter as one atomic unit.
    /// A uniqueness violation surfaces as `AppError::DuplicateEmail`.
    async fn create_signup(&self, signup: &NewWaitlistUser) -> AppResult<i32>;
    async fn count(&self) -> AppResult<i64>;
    /// All signups, most recent first.
    async fn list_recent(&self) -> AppResult<Vec<WaitlistUser>>;
    async fn analytics(&self) -> AppResult<AnalyticsSnapshot>;
}

/// Raw signup fields as submitted by the client.
#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
}

/// Request metadata captured alongside a signup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Clone)]
pub struct WaitlistUseCases {
    repo: Arc<dyn WaitlistRepo>,
    deployment_mode: DeploymentMode,
}

impl WaitlistUseCases {
    pub fn new(repo: Arc<dyn WaitlistRepo>, deployment_mode: DeploymentMode) -> Self {
        Self {
            repo,
            deployment_mode,
        }
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.repo.ping().await
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> AppResult<i64> {
        self.repo.count().await
    }

    /// Validates and records a signup, returning the new row id.
    ///
    /// The existence check only saves a write for the common duplicate case;
    /// the store's unique constraint decides, and both paths yield
    /// `AppError::DuplicateEmail`.
    #[instrument(skip_all, fields(ip = ?client.ip_address))]
    pub async fn signup(&self, input: SignupInput, client: ClientMeta) -> AppResult<i32> {
        let signup = build_signup(input, client)?;

        if self.repo.email_exists(&signup.email).await? {
            info!("Signup rejected: email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let user_id = self.repo.create_signup(&signup).await?;
        info!(user_id, "New waitlist signup");
        Ok(user_id)
    }

    #[instrument(skip(self))]
    pub async fn list_signups(&self) -> AppResult<Vec<WaitlistUser>> {
        self.ensure_admin_available()?;
        self.repo.list_recent().await
    }

    #[instrument(skip(self))]
    pub async fn analytics(&self) -> AppResult<AnalyticsSnapshot> {
        self.ensure_admin_available()?;
        self.repo.analytics().await
    }

    // Admin views are a development convenience with no auth in front of them.
    fn ensure_admin_available(&self) -> AppResult<()> {
        if self.deployment_mode.is_production() {
            return Err(AppError::Forbidden);
        }
        Ok(())
    }
}

/// Turns raw input into a storable signup. Never touches the store.
pub fn build_signup(input: SignupInput, client: ClientMeta) -> AppResult<NewWaitlistUser> {
    let (Some(name), Some(email), Some(phone)) = (
        required(input.name.as_deref()),
        required(input.email.as_deref()),
        required(input.phone.as_deref()),
    ) else {
        return Err(AppError::InvalidInput(
            "Name, email, and phone are required".into(),
        ));
    };

    if !is_valid_email(email) {
        return Err(AppError::InvalidInput("Invalid email format".into()));
    }
    if !within_len(name, MAX_NAME_LEN) {
        return Err(AppError::InvalidInput(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    if !within_len(phone, MAX_PHONE_LEN) {
        return Err(AppError::InvalidInput(format!(
            "Phone must be at most {MAX_PHONE_LEN} characters"
        )));
    }

    let gender = optional_or(input.gender.as_deref(), DEFAULT_GENDER);
    let age = optional_or(input.age.as_deref(), DEFAULT_AGE);
    if !within_len(gender, MAX_PROFILE_FIELD_LEN) || !within_len(age, MAX_PROFILE_FIELD_LEN) {
        return Err(AppError::InvalidInput(format!(
            "Gender and age must be at most {MAX_PROFILE_FIELD_LEN} characters"
        )));
    }

    let user_agent = client
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|ua| !ua.is_empty())
        .map(|ua| ua.chars().take(MAX_USER_AGENT_LEN).collect())
        .unwrap_or_else(|| UNKNOWN_USER_AGENT.to_string());

    Ok(NewWaitlistUser {
        name: name.to_string(),
        email: normalize_email(email),
        phone: phone.to_string(),
        gender: gender.to_string(),
        age: age.to_string(),
        ip_address: client.ip_address,
        user_agent,
    })
}
