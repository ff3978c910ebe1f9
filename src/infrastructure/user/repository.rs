//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{LeaderboardEntry, User, UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
///
/// Backs tests and local development. Uniqueness of username, telegram_id
/// and api_key is enforced the way the database constraints would.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users
    pub async fn with_users(users: Vec<User>) -> Result<Self, DomainError> {
        let repo = Self::new();

        for user in users {
            repo.create(user).await?;
        }

        Ok(repo)
    }

    fn conflict_for(users: &HashMap<String, User>, candidate: &User) -> Option<DomainError> {
        for existing in users.values() {
            if existing.id() == candidate.id() {
                continue;
            }

            if existing.username() == candidate.username() {
                return Some(DomainError::conflict(format!(
                    "Username '{}' already exists",
                    candidate.username()
                )));
            }

            if existing.telegram_id() == candidate.telegram_id() {
                return Some(DomainError::conflict(format!(
                    "Telegram ID '{}' already exists",
                    candidate.telegram_id()
                )));
            }

            if existing.api_key() == candidate.api_key() {
                return Some(DomainError::conflict("API key already exists"));
            }
        }

        None
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(id.as_str()).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username() == username).cloned())
    }

    async fn get_by_telegram_id(&self, telegram_id: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.telegram_id() == telegram_id)
            .cloned())
    }

    async fn get_by_api_key(&self, api_key: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.api_key() == api_key).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.contains_key(user.id().as_str()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        if let Some(conflict) = Self::conflict_for(&users, &user) {
            return Err(conflict);
        }

        users.insert(user.id().as_str().to_string(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if !users.contains_key(user.id().as_str()) {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        }

        if let Some(conflict) = Self::conflict_for(&users, user) {
            return Err(conflict);
        }

        users.insert(user.id().as_str().to_string(), user.clone());

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        Ok(users.remove(id.as_str()).is_some())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by_key(|u| u.created_at());

        Ok(result)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let users = self.users.read().await;
        Ok(users.len())
    }

    async fn record_login(&self, id: &UserId) -> Result<(), DomainError> {
        let mut users = self.users.write().await;

        if let Some(user) = users.get_mut(id.as_str()) {
            user.record_login();
            Ok(())
        } else {
            Err(DomainError::not_found(format!("User '{}' not found", id)))
        }
    }

    async fn top_by_credits(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, DomainError> {
        let users = self.users.read().await;

        let mut all: Vec<&User> = users.values().collect();
        all.sort_by(|a, b| b.credits().cmp(&a.credits()));

        Ok(all
            .into_iter()
            .take(limit)
            .map(|u| LeaderboardEntry {
                username: u.username().to_string(),
                credits: u.credits(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(username: &str, telegram_id: &str, api_key: &str) -> User {
        User::new(
            UserId::generate(),
            username,
            telegram_id,
            "pin_hash",
            "password_hash",
            api_key,
            "en",
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("alice", "111", "AAAA-AAAA-AAAA-AAAA");

        repo.create(user.clone()).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().username(), "alice");
    }

    #[tokio::test]
    async fn test_lookup_by_username_telegram_and_key() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("alice", "111", "AAAA-AAAA-AAAA-AAAA");

        repo.create(user.clone()).await.unwrap();

        assert!(repo.get_by_username("alice").await.unwrap().is_some());
        assert!(repo.get_by_telegram_id("111").await.unwrap().is_some());
        assert!(repo
            .get_by_api_key("AAAA-AAAA-AAAA-AAAA")
            .await
            .unwrap()
            .is_some());

        assert!(repo.get_by_username("bob").await.unwrap().is_none());
        assert!(repo.get_by_telegram_id("222").await.unwrap().is_none());
        assert!(repo
            .get_by_api_key("BBBB-BBBB-BBBB-BBBB")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("alice", "111", "AAAA-AAAA-AAAA-AAAA"))
            .await
            .unwrap();

        let result = repo
            .create(create_test_user("alice", "222", "BBBB-BBBB-BBBB-BBBB"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_telegram_id() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("alice", "111", "AAAA-AAAA-AAAA-AAAA"))
            .await
            .unwrap();

        let result = repo
            .create(create_test_user("bob", "111", "BBBB-BBBB-BBBB-BBBB"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_api_key() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("alice", "111", "AAAA-AAAA-AAAA-AAAA"))
            .await
            .unwrap();

        let result = repo
            .create(create_test_user("bob", "222", "AAAA-AAAA-AAAA-AAAA"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_update() {
        let repo = InMemoryUserRepository::new();
        let mut user = create_test_user("alice", "111", "AAAA-AAAA-AAAA-AAAA");

        repo.create(user.clone()).await.unwrap();

        user.set_credits(50);
        repo.update(&user).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.credits(), 50);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("alice", "111", "AAAA-AAAA-AAAA-AAAA");

        let result = repo.update(&user).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("alice", "111", "AAAA-AAAA-AAAA-AAAA");

        repo.create(user.clone()).await.unwrap();

        assert!(repo.delete(user.id()).await.unwrap());
        assert!(repo.get(user.id()).await.unwrap().is_none());
        assert!(!repo.delete(user.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_record_login() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("alice", "111", "AAAA-AAAA-AAAA-AAAA");

        repo.create(user.clone()).await.unwrap();
        repo.record_login(user.id()).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert!(retrieved.last_login_at().is_some());
    }

    #[tokio::test]
    async fn test_top_by_credits() {
        let repo = InMemoryUserRepository::new();

        let mut alice = create_test_user("alice", "111", "AAAA-AAAA-AAAA-AAAA");
        alice.set_credits(10);
        let mut bob = create_test_user("bob", "222", "BBBB-BBBB-BBBB-BBBB");
        bob.set_credits(30);
        let mut carol = create_test_user("carol", "333", "CCCC-CCCC-CCCC-CCCC");
        carol.set_credits(20);

        repo.create(alice).await.unwrap();
        repo.create(bob).await.unwrap();
        repo.create(carol).await.unwrap();

        let top = repo.top_by_credits(2).await.unwrap();

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].username, "bob");
        assert_eq!(top[0].credits, 30);
        assert_eq!(top[1].username, "carol");
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("alice", "111", "AAAA-AAAA-AAAA-AAAA"))
            .await
            .unwrap();
        repo.create(create_test_user("bob", "222", "BBBB-BBBB-BBBB-BBBB"))
            .await
            .unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
