//! User repository trait

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// A row of the credits leaderboard
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub credits: i64,
}

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their username
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Get a user by their Telegram ID
    async fn get_by_telegram_id(&self, telegram_id: &str) -> Result<Option<User>, DomainError>;

    /// Get a user by their API key (for login)
    async fn get_by_api_key(&self, api_key: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// List all users
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Count users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Record a login for a user
    async fn record_login(&self, id: &UserId) -> Result<(), DomainError>;

    /// Top users ordered by credit balance
    async fn top_by_credits(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, DomainError>;

    /// Check if a username exists
    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_username(username).await?.is_some())
    }

    /// Check if a Telegram ID exists
    async fn telegram_id_exists(&self, telegram_id: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_telegram_id(telegram_id).await?.is_some())
    }
}
