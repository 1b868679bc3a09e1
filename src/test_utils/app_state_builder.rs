//! Test app state builder for HTTP-level testing.
//!
//! This module provides `TestAppStateBuilder` which creates a minimal `AppState`
//! with in-memory mocks for testing HTTP endpoints.

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use axum::http::HeaderValue;
use secrecy::SecretString;

use crate::{
    adapters::http::app_state::AppState,
    domain::entities::deployment_mode::DeploymentMode,
    infra::{RateLimiterTrait, config::AppConfig, rate_limit::InMemoryRateLimiter},
    test_utils::InMemoryWaitlistRepo,
    use_cases::waitlist::WaitlistUseCases,
};

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let repo = Arc::new(InMemoryWaitlistRepo::new());
/// let app_state = TestAppStateBuilder::new()
///     .with_repo(repo.clone())
///     .with_deployment_mode(DeploymentMode::Production)
///     .build();
/// ```
pub struct TestAppStateBuilder {
    repo: Option<Arc<InMemoryWaitlistRepo>>,
    deployment_mode: DeploymentMode,
    rate_limit_per_ip: Option<u64>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            repo: None,
            deployment_mode: DeploymentMode::Development,
            rate_limit_per_ip: None,
        }
    }

    /// Use a specific repo (keep a clone of the Arc for assertions).
    pub fn with_repo(mut self, repo: Arc<InMemoryWaitlistRepo>) -> Self {
        self.repo = Some(repo);
        self
    }

    pub fn with_deployment_mode(mut self, mode: DeploymentMode) -> Self {
        self.deployment_mode = mode;
        self
    }

    /// Enforce a real per-IP limit instead of the permissive default.
    pub fn with_rate_limit(mut self, per_ip: u64) -> Self {
        self.rate_limit_per_ip = Some(per_ip);
        self
    }

    pub fn build(self) -> AppState {
        let repo = self
            .repo
            .unwrap_or_else(|| Arc::new(InMemoryWaitlistRepo::new()));

        let waitlist_use_cases = Arc::new(WaitlistUseCases::new(repo, self.deployment_mode));

        let rate_limiter: Arc<dyn RateLimiterTrait> = match self.rate_limit_per_ip {
            Some(per_ip) => Arc::new(InMemoryRateLimiter::new(60, per_ip)),
            None => Arc::new(InMemoryRateLimiter::permissive()),
        };

        // Create minimal config for testing
        let config = Arc::new(AppConfig {
            database_url: SecretString::new("postgres://localhost/waitlist_test".into()),
            deployment_mode: self.deployment_mode,
            bind_addr: "127.0.0.1:3000".parse::<SocketAddr>().unwrap(),
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public"),
            db_max_connections: 20,
            db_idle_timeout: Duration::from_secs(30),
            db_acquire_timeout: Duration::from_secs(2),
            db_connect_retries: 5,
            db_connect_retry_delay: Duration::from_secs(5),
            rate_limit_window_secs: 60,
            rate_limit_per_ip: self.rate_limit_per_ip.unwrap_or(u64::MAX),
            redis_url: None,
            trust_proxy: false,
            request_body_limit: 10 * 1024,
        });

        AppState {
            config,
            waitlist_use_cases,
            rate_limiter,
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
