use crate::{adapters::persistence::PostgresPersistence, infra::config::AppConfig};

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod rate_limit;
pub mod setup;

pub use error::InfraError;
pub use rate_limit::RateLimiterTrait;

/// Builds the pool, waits for the store to answer and makes sure the schema
/// exists. Any failure here is fatal to startup.
pub async fn postgres_persistence(config: &AppConfig) -> Result<PostgresPersistence, InfraError> {
    let pool = db::init_db(config)?;
    db::wait_for_database(&pool, config.db_connect_retries, config.db_connect_retry_delay).await?;
    let persistence = PostgresPersistence::new(pool);
    persistence.ensure_schema().await?;
    Ok(persistence)
}
