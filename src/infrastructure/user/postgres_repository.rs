//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::user::{LeaderboardEntry, User, UserId, UserRecord, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, username, telegram_id, pin_hash, password_hash, api_key, \
     credits, is_admin, banned, language, last_api_key_reset, \
     created_at, updated_at, last_login_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("id", id.as_str()).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("username", username).await
    }

    async fn get_by_telegram_id(&self, telegram_id: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("telegram_id", telegram_id).await
    }

    async fn get_by_api_key(&self, api_key: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("api_key", api_key).await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, telegram_id, pin_hash, password_hash, api_key,
                               credits, is_admin, banned, language, last_api_key_reset,
                               created_at, updated_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.username())
        .bind(user.telegram_id())
        .bind(user.pin_hash())
        .bind(user.password_hash())
        .bind(user.api_key())
        .bind(user.credits())
        .bind(user.is_admin())
        .bind(user.banned())
        .bind(user.language())
        .bind(user.last_api_key_reset())
        .bind(user.created_at())
        .bind(user.updated_at())
        .bind(user.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &user))?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, telegram_id = $3, pin_hash = $4, password_hash = $5,
                api_key = $6, credits = $7, is_admin = $8, banned = $9, language = $10,
                last_api_key_reset = $11, updated_at = $12, last_login_at = $13
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.username())
        .bind(user.telegram_id())
        .bind(user.pin_hash())
        .bind(user.password_hash())
        .bind(user.api_key())
        .bind(user.credits())
        .bind(user.is_admin())
        .bind(user.banned())
        .bind(user.language())
        .bind(user.last_api_key_reset())
        .bind(user.updated_at())
        .bind(user.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, user))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let query = format!("SELECT {} FROM users ORDER BY created_at", USER_COLUMNS);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::with_capacity(rows.len());

        for row in rows {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record login: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        }

        Ok(())
    }

    async fn top_by_credits(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, DomainError> {
        let rows = sqlx::query(
            "SELECT username, credits FROM users ORDER BY credits DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to load leaderboard: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| LeaderboardEntry {
                username: row.get("username"),
                credits: row.get("credits"),
            })
            .collect())
    }
}

fn map_unique_violation(e: sqlx::Error, user: &User) -> DomainError {
    let msg = e.to_string();

    if msg.contains("duplicate key") || msg.contains("unique constraint") {
        if msg.contains("username") {
            DomainError::conflict(format!("Username '{}' already exists", user.username()))
        } else if msg.contains("telegram_id") {
            DomainError::conflict(format!(
                "Telegram ID '{}' already exists",
                user.telegram_id()
            ))
        } else if msg.contains("api_key") {
            DomainError::conflict("API key already exists")
        } else {
            DomainError::conflict(format!("User with ID '{}' already exists", user.id()))
        }
    } else {
        DomainError::storage(format!("Failed to store user: {}", e))
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: String = row.get("id");

    let user_id = UserId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(User::from_record(UserRecord {
        id: user_id,
        username: row.get("username"),
        telegram_id: row.get("telegram_id"),
        pin_hash: row.get("pin_hash"),
        password_hash: row.get("password_hash"),
        api_key: row.get("api_key"),
        credits: row.get("credits"),
        is_admin: row.get("is_admin"),
        banned: row.get("banned"),
        language: row.get("language"),
        last_api_key_reset: row.get("last_api_key_reset"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        last_login_at: row.get("last_login_at"),
    }))
}
