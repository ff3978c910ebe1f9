//! PostgreSQL activity repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::activity::{Activity, ActivityRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of ActivityRepository
#[derive(Debug, Clone)]
pub struct PostgresActivityRepository {
    pool: PgPool,
}

impl PostgresActivityRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for PostgresActivityRepository {
    async fn record(&self, activity: Activity) -> Result<Activity, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO activities (id, user_id, action, details, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(activity.id())
        .bind(activity.user_id().as_str())
        .bind(activity.action())
        .bind(activity.details())
        .bind(activity.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to record activity: {}", e)))?;

        Ok(activity)
    }

    async fn recent_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Activity>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, action, details, created_at
            FROM activities
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to load activities: {}", e)))?;

        let mut activities = Vec::with_capacity(rows.len());

        for row in rows {
            let raw_user_id: String = row.get("user_id");
            let user_id = UserId::new(&raw_user_id).map_err(|e| {
                DomainError::storage(format!("Invalid user ID in database: {}", e))
            })?;

            activities.push(Activity::from_parts(
                row.get("id"),
                user_id,
                row.get("action"),
                row.get("details"),
                row.get("created_at"),
            ));
        }

        Ok(activities)
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM activities WHERE user_id = $1")
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete activities: {}", e)))?;

        Ok(result.rows_affected())
    }
}
