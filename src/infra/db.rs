use std::{future::Future, str::FromStr, time::Duration};

use secrecy::ExposeSecret;
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};
use tracing::{info, warn};

use crate::infra::{InfraError, config::AppConfig};

/// Builds the shared pool. Connections are opened lazily, so this only fails
/// on a malformed connection string; reachability is checked by
/// [`wait_for_database`].
pub fn init_db(config: &AppConfig) -> Result<PgPool, InfraError> {
    let mut options = PgConnectOptions::from_str(config.database_url.expose_secret())
        .map_err(|_| InfraError::InvalidConfig {
            var: "DATABASE_URL",
            reason: "not a valid Postgres connection string".into(),
        })?;
    if config.deployment_mode.is_production() {
        options = options.ssl_mode(PgSslMode::Require);
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .idle_timeout(config.db_idle_timeout)
        .acquire_timeout(config.db_acquire_timeout)
        .connect_lazy_with(options);

    Ok(pool)
}

/// Round-trips `SELECT 1` until it succeeds, giving up after `max_retries`
/// attempts spaced by `retry_delay`.
pub async fn wait_for_database(
    pool: &PgPool,
    max_retries: u32,
    retry_delay: Duration,
) -> Result<(), InfraError> {
    retry_until_ready(max_retries, retry_delay, move || async move {
        sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
    })
    .await?;
    info!("Connected to database!");
    Ok(())
}

pub(crate) async fn retry_until_ready<F, Fut>(
    max_retries: u32,
    retry_delay: Duration,
    mut probe: F,
) -> Result<u32, InfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), sqlx::Error>>,
{
    let max_retries = max_retries.max(1);
    let mut attempt = 1;
    loop {
        match probe().await {
            Ok(()) => return Ok(attempt),
            Err(e) if attempt >= max_retries => {
                return Err(InfraError::DatabaseUnavailable {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_retries,
                    error = %e,
                    "Database not ready, retrying in {}s",
                    retry_delay.as_secs()
                );
                tokio::time::sleep(retry_delay).await;
                attempt += 1;
            }
        }
    }
}
