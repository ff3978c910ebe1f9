//! Application state for shared services

use std::sync::Arc;

use crate::domain::activity::{Activity, ActivityRepository};
use crate::domain::user::{LeaderboardEntry, User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::security::RateLimiter;
use crate::infrastructure::user::{
    AdminCreateUserRequest, AdminUpdateUserRequest, ApiKeyResetOutcome, CredentialHasher,
    CreditAction, RegisterRequest, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(user_service: Arc<dyn UserServiceTrait>, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            user_service,
            rate_limiter,
        }
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError>;
    async fn login(&self, api_key: &str) -> Result<User, DomainError>;
    async fn get_by_api_key(&self, api_key: &str) -> Result<Option<User>, DomainError>;
    async fn recover_key(&self, telegram_id: &str, pin: &str) -> Result<String, DomainError>;
    async fn reset_api_key(&self, id: &UserId) -> Result<ApiKeyResetOutcome, DomainError>;
    async fn change_password(
        &self,
        id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError>;
    async fn change_pin(
        &self,
        id: &UserId,
        current_pin: &str,
        new_pin: &str,
    ) -> Result<(), DomainError>;
    async fn delete_account(&self, id: &UserId, pin: &str) -> Result<(), DomainError>;
    async fn activities(&self, id: &UserId, limit: usize) -> Result<Vec<Activity>, DomainError>;
    async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, DomainError>;
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;
    async fn list(&self) -> Result<Vec<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
    async fn admin_create(&self, request: AdminCreateUserRequest) -> Result<User, DomainError>;
    async fn admin_update(
        &self,
        id: &UserId,
        request: AdminUpdateUserRequest,
    ) -> Result<User, DomainError>;
    async fn toggle_ban(&self, id: &UserId) -> Result<User, DomainError>;
    async fn adjust_credits(
        &self,
        id: &UserId,
        amount: i64,
        action: CreditAction,
    ) -> Result<User, DomainError>;
    async fn admin_delete(&self, id: &UserId) -> Result<bool, DomainError>;
}

#[async_trait::async_trait]
impl<R, A, H> UserServiceTrait for UserService<R, A, H>
where
    R: UserRepository + 'static,
    A: ActivityRepository + 'static,
    H: CredentialHasher + 'static,
{
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn login(&self, api_key: &str) -> Result<User, DomainError> {
        UserService::login(self, api_key).await
    }

    async fn get_by_api_key(&self, api_key: &str) -> Result<Option<User>, DomainError> {
        UserService::get_by_api_key(self, api_key).await
    }

    async fn recover_key(&self, telegram_id: &str, pin: &str) -> Result<String, DomainError> {
        UserService::recover_key(self, telegram_id, pin).await
    }

    async fn reset_api_key(&self, id: &UserId) -> Result<ApiKeyResetOutcome, DomainError> {
        UserService::reset_api_key(self, id).await
    }

    async fn change_password(
        &self,
        id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        UserService::change_password(self, id, current_password, new_password).await
    }

    async fn change_pin(
        &self,
        id: &UserId,
        current_pin: &str,
        new_pin: &str,
    ) -> Result<(), DomainError> {
        UserService::change_pin(self, id, current_pin, new_pin).await
    }

    async fn delete_account(&self, id: &UserId, pin: &str) -> Result<(), DomainError> {
        UserService::delete_account(self, id, pin).await
    }

    async fn activities(&self, id: &UserId, limit: usize) -> Result<Vec<Activity>, DomainError> {
        UserService::activities(self, id, limit).await
    }

    async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, DomainError> {
        UserService::leaderboard(self, limit).await
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        UserService::list(self).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }

    async fn admin_create(&self, request: AdminCreateUserRequest) -> Result<User, DomainError> {
        UserService::admin_create(self, request).await
    }

    async fn admin_update(
        &self,
        id: &UserId,
        request: AdminUpdateUserRequest,
    ) -> Result<User, DomainError> {
        UserService::admin_update(self, id, request).await
    }

    async fn toggle_ban(&self, id: &UserId) -> Result<User, DomainError> {
        UserService::toggle_ban(self, id).await
    }

    async fn adjust_credits(
        &self,
        id: &UserId,
        amount: i64,
        action: CreditAction,
    ) -> Result<User, DomainError> {
        UserService::adjust_credits(self, id, amount, action).await
    }

    async fn admin_delete(&self, id: &UserId) -> Result<bool, DomainError> {
        UserService::admin_delete(self, id).await
    }
}
