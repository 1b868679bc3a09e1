use std::{net::SocketAddr, path::PathBuf, time::Duration};

use axum::http::HeaderValue;
use env_helpers::get_env_default;
use secrecy::SecretString;

use crate::{domain::entities::deployment_mode::DeploymentMode, infra::InfraError};

pub struct AppConfig {
    pub database_url: SecretString,
    /// Production forces TLS to the store, hides the admin endpoints and
    /// switches logging to JSON.
    pub deployment_mode: DeploymentMode,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    /// Directory holding the single-page front end. `index.html` is the fallback.
    pub static_dir: PathBuf,
    pub db_max_connections: u32,
    pub db_idle_timeout: Duration,
    pub db_acquire_timeout: Duration,
    pub db_connect_retries: u32,
    pub db_connect_retry_delay: Duration,
    pub rate_limit_window_secs: u64,
    pub rate_limit_per_ip: u64,
    /// When set, rate limit counters live in Redis and are shared between instances.
    pub redis_url: Option<String>,
    /// Whether to trust X-Forwarded-For headers for rate limiting. Set to true when
    /// behind a reverse proxy.
    pub trust_proxy: bool,
    pub request_body_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| InfraError::ConfigMissing { var: "DATABASE_URL" })?;
        let database_url = SecretString::new(database_url.into());

        let deployment_mode = DeploymentMode::from_raw(std::env::var("APP_ENV").ok().as_deref());

        let bind_addr: SocketAddr =
            get_env_default("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)));
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .map_err(|_| InfraError::InvalidConfig {
                    var: "CORS_ORIGIN",
                    reason: "not a valid header value".into(),
                })?;
        let static_dir: String = get_env_default("STATIC_DIR", String::from("public"));

        let db_max_connections: u32 = get_env_default("DB_MAX_CONNECTIONS", 20);
        let db_idle_timeout_secs: u64 = get_env_default("DB_IDLE_TIMEOUT_SECS", 30);
        let db_acquire_timeout_secs: u64 = get_env_default("DB_ACQUIRE_TIMEOUT_SECS", 2);
        let db_connect_retries: u32 = get_env_default("DB_CONNECT_RETRIES", 5);
        let db_connect_retry_delay_secs: u64 = get_env_default("DB_CONNECT_RETRY_DELAY_SECS", 5);
        if db_max_connections == 0 {
            return Err(InfraError::InvalidConfig {
                var: "DB_MAX_CONNECTIONS",
                reason: "must be at least 1".into(),
            });
        }
        if db_connect_retries == 0 {
            return Err(InfraError::InvalidConfig {
                var: "DB_CONNECT_RETRIES",
                reason: "must be at least 1".into(),
            });
        }

        let rate_limit_window_secs: u64 = get_env_default("RATE_LIMIT_WINDOW_SECS", 900);
        let rate_limit_per_ip: u64 = get_env_default("RATE_LIMIT_PER_IP", 100);
        let redis_url: Option<String> = std::env::var("REDIS_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        // Default to false for security - must explicitly enable when behind a trusted proxy
        let trust_proxy: bool = get_env_default("TRUST_PROXY", false);
        let request_body_limit: usize = get_env_default("REQUEST_BODY_LIMIT_BYTES", 10 * 1024);

        Ok(Self {
            database_url,
            deployment_mode,
            bind_addr,
            cors_origin,
            static_dir: PathBuf::from(static_dir),
            db_max_connections,
            db_idle_timeout: Duration::from_secs(db_idle_timeout_secs),
            db_acquire_timeout: Duration::from_secs(db_acquire_timeout_secs),
            db_connect_retries,
            db_connect_retry_delay: Duration::from_secs(db_connect_retry_delay_secs),
            rate_limit_window_secs,
            rate_limit_per_ip,
            redis_url,
            trust_proxy,
            request_body_limit,
        })
    }
}
