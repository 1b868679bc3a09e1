//! Schema bootstrap.
//!
//! Runs on every start. Every statement is create-if-absent, so an existing
//! store is never dropped or rewritten.

use sqlx::Row;
use tracing::info;

use crate::{adapters::persistence::PostgresPersistence, infra::InfraError};

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS waitlist_users (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    phone VARCHAR(50) NOT NULL,
    gender VARCHAR(50) NOT NULL DEFAULT 'prefer-not-to-say',
    age VARCHAR(50) NOT NULL DEFAULT 'not-specified',
    created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
    ip_address VARCHAR(45),
    user_agent TEXT
)
"#;

const CREATE_EMAIL_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_waitlist_users_email ON waitlist_users (email)";

const CREATE_CREATED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_waitlist_users_created_at ON waitlist_users (created_at)";

const CREATE_ANALYTICS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS waitlist_analytics (
    id SERIAL PRIMARY KEY,
    total_signups INTEGER NOT NULL DEFAULT 0,
    last_updated TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

const SEED_ANALYTICS_ROW: &str = r#"
INSERT INTO waitlist_analytics (total_signups)
SELECT 0
WHERE NOT EXISTS (SELECT 1 FROM waitlist_analytics)
"#;

// Serializes concurrent bootstraps from several instances starting at once.
const BOOTSTRAP_LOCK_KEY: i64 = 0x7761_6974_6c73;

impl PostgresPersistence {
    /// Ensures both tables, their indexes and the single analytics row exist.
    pub async fn ensure_schema(&self) -> Result<(), InfraError> {
        let mut tx = self.pool.begin().await.map_err(InfraError::SchemaBootstrap)?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BOOTSTRAP_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(InfraError::SchemaBootstrap)?;

        let row = sqlx::query(
            r#"
            SELECT to_regclass('waitlist_users') IS NOT NULL AS users_present,
                   to_regclass('waitlist_analytics') IS NOT NULL AS analytics_present
            "#,
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(InfraError::SchemaBootstrap)?;
        let users_present: bool = row.get("users_present");
        let analytics_present: bool = row.get("analytics_present");

        if users_present && analytics_present {
            info!("Waitlist tables present");
        } else {
            info!(
                users_present,
                analytics_present, "Creating missing waitlist tables"
            );
        }

        for statement in [
            CREATE_USERS_TABLE,
            CREATE_EMAIL_INDEX,
            CREATE_CREATED_AT_INDEX,
            CREATE_ANALYTICS_TABLE,
            SEED_ANALYTICS_ROW,
        ] {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(InfraError::SchemaBootstrap)?;
        }

        tx.commit().await.map_err(InfraError::SchemaBootstrap)?;
        info!("Database schema ready");
        Ok(())
    }
}
