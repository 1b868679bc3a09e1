use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::waitlist::WaitlistRepo,
    domain::entities::{
        analytics::AnalyticsSnapshot,
        waitlist_user::{NewWaitlistUser, WaitlistUser},
    },
};

#[async_trait]
impl WaitlistRepo for PostgresPersistence {
    async fn ping(&self) -> AppResult<()> {
        // Report the underlying cause: health output exists to explain outages.
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM waitlist_users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.get(0))
    }

    async fn create_signup(&self, signup: &NewWaitlistUser) -> AppResult<i32> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        let row = sqlx::query(
            r#"
            INSERT INTO waitlist_users (name, email, phone, gender, age, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&signup.name)
        .bind(&signup.email)
        .bind(&signup.phone)
        .bind(&signup.gender)
        .bind(&signup.age)
        .bind(&signup.ip_address)
        .bind(&signup.user_agent)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;
        let id: i32 = row.get("id");

        sqlx::query(
            r#"
            UPDATE waitlist_analytics
            SET total_signups = total_signups + 1, last_updated = CURRENT_TIMESTAMP
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;
        Ok(id)
    }

    async fn count(&self) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM waitlist_users")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.get("count"))
    }

    async fn list_recent(&self) -> AppResult<Vec<WaitlistUser>> {
        let users = sqlx::query_as::<_, WaitlistUser>(
            r#"
            SELECT id, name, email, phone,
                   COALESCE(gender, 'prefer-not-to-say') AS gender,
                   COALESCE(age, 'not-specified') AS age,
                   created_at, ip_address, user_agent
            FROM waitlist_users
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(users)
    }

    async fn analytics(&self) -> AppResult<AnalyticsSnapshot> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE((SELECT total_signups::BIGINT FROM waitlist_analytics ORDER BY id LIMIT 1), 0) AS total_signups,
                (SELECT last_updated FROM waitlist_analytics ORDER BY id LIMIT 1) AS last_updated,
                (SELECT COUNT(*) FROM waitlist_users) AS row_count
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        let last_updated: Option<DateTime<Utc>> = row.get("last_updated");
        Ok(AnalyticsSnapshot {
            total_signups: row.get("total_signups"),
            last_updated,
            row_count: row.get("row_count"),
        })
    }
}
