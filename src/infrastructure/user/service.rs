//! User service: registration, authentication and account management

use std::sync::Arc;

use tracing::info;

use crate::domain::activity::{Activity, ActivityRepository};
use crate::domain::user::{
    validate_password, validate_pin, validate_telegram_id, validate_username, LeaderboardEntry,
    User, UserId, UserRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::security::{reset_eligibility, ApiKeyGenerator};

use super::password::CredentialHasher;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub telegram_id: String,
    pub pin: String,
    pub password: String,
    pub language: String,
}

/// Request for creating a user through the admin surface
#[derive(Debug, Clone)]
pub struct AdminCreateUserRequest {
    pub username: String,
    pub telegram_id: String,
    pub pin: String,
    pub password: String,
    pub credits: i64,
    pub is_admin: bool,
}

/// Admin edit of a user's balance and role
#[derive(Debug, Clone)]
pub struct AdminUpdateUserRequest {
    pub credits: Option<i64>,
    pub is_admin: Option<bool>,
}

/// Direction of an admin credit adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditAction {
    Add,
    Remove,
}

impl std::fmt::Display for CreditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Outcome of an API key reset request
#[derive(Debug, Clone)]
pub enum ApiKeyResetOutcome {
    /// Cooldown elapsed; the user's key was replaced
    Reset { api_key: String },
    /// Still inside the 30-day cooldown
    OnCooldown { days_left: i64 },
}

/// User service for authentication and account management
#[derive(Debug)]
pub struct UserService<R: UserRepository, A: ActivityRepository, H: CredentialHasher> {
    users: Arc<R>,
    activities: Arc<A>,
    hasher: Arc<H>,
    key_generator: ApiKeyGenerator,
}

impl<R: UserRepository, A: ActivityRepository, H: CredentialHasher> UserService<R, A, H> {
    /// Create a new user service
    pub fn new(users: Arc<R>, activities: Arc<A>, hasher: Arc<H>) -> Self {
        Self {
            users,
            activities,
            hasher,
            key_generator: ApiKeyGenerator::new(),
        }
    }

    /// Register a new user and issue their API key
    ///
    /// The returned user carries the freshly generated key; it is shown to
    /// the caller exactly once.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        validate_username(&request.username)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_telegram_id(&request.telegram_id)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_pin(&request.pin).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if self.users.username_exists(&request.username).await? {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                request.username
            )));
        }

        if self.users.telegram_id_exists(&request.telegram_id).await? {
            return Err(DomainError::conflict(format!(
                "Telegram ID '{}' already exists",
                request.telegram_id
            )));
        }

        let pin_hash = self.hasher.hash(&request.pin)?;
        let password_hash = self.hasher.hash(&request.password)?;
        let api_key = self.key_generator.generate();

        let user = User::new(
            UserId::generate(),
            &request.username,
            &request.telegram_id,
            pin_hash,
            password_hash,
            api_key,
            &request.language,
        );

        let user = self.users.create(user).await?;

        info!(user_id = %user.id(), "User registered");

        self.activities
            .record(Activity::new(user.id().clone(), "register", "Account created"))
            .await?;

        Ok(user)
    }

    /// Authenticate a user by API key
    ///
    /// Unknown keys fail with a credential error; banned users are rejected
    /// outright.
    pub async fn login(&self, api_key: &str) -> Result<User, DomainError> {
        let user = self
            .users
            .get_by_api_key(api_key)
            .await?
            .ok_or_else(|| DomainError::credential("Invalid API key"))?;

        if !user.can_login() {
            return Err(DomainError::forbidden("Account is banned"));
        }

        self.users.record_login(user.id()).await?;

        self.activities
            .record(Activity::new(user.id().clone(), "login", "Logged in with API key"))
            .await?;

        // Re-fetch to pick up last_login_at
        self.users
            .get(user.id())
            .await?
            .ok_or_else(|| DomainError::internal("User vanished during login"))
    }

    /// Look up a user by API key without recording a login (request auth)
    pub async fn get_by_api_key(&self, api_key: &str) -> Result<Option<User>, DomainError> {
        self.users.get_by_api_key(api_key).await
    }

    /// Recover an API key from a Telegram ID + PIN pair
    ///
    /// Failure is uniform: callers cannot distinguish a wrong PIN from an
    /// unknown Telegram ID.
    pub async fn recover_key(&self, telegram_id: &str, pin: &str) -> Result<String, DomainError> {
        let user = self
            .users
            .get_by_telegram_id(telegram_id)
            .await?
            .ok_or_else(|| DomainError::credential("Invalid credentials"))?;

        if !self.hasher.verify(pin, user.pin_hash()) {
            return Err(DomainError::credential("Invalid credentials"));
        }

        Ok(user.api_key().to_string())
    }

    /// Reset a user's API key, subject to the 30-day cooldown
    pub async fn reset_api_key(&self, id: &UserId) -> Result<ApiKeyResetOutcome, DomainError> {
        let mut user = self.get_required(id).await?;

        let eligibility = reset_eligibility(user.last_api_key_reset());

        if !eligibility.can_reset {
            return Ok(ApiKeyResetOutcome::OnCooldown {
                days_left: eligibility.days_left,
            });
        }

        let api_key = self.key_generator.generate();
        user.reset_api_key(&api_key);

        self.users.update(&user).await?;

        info!(user_id = %id, "API key reset");

        self.activities
            .record(Activity::new(id.clone(), "api_key_reset", "API key regenerated"))
            .await?;

        Ok(ApiKeyResetOutcome::Reset { api_key })
    }

    /// Change a user's password after verifying the current one
    pub async fn change_password(
        &self,
        id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        let mut user = self.get_required(id).await?;

        if !self.hasher.verify(current_password, user.password_hash()) {
            return Err(DomainError::credential("Current password is incorrect"));
        }

        validate_password(new_password).map_err(|e| DomainError::validation(e.to_string()))?;

        user.set_password_hash(self.hasher.hash(new_password)?);
        self.users.update(&user).await?;

        self.activities
            .record(Activity::new(id.clone(), "password_change", "Password updated"))
            .await?;

        Ok(())
    }

    /// Change a user's PIN after verifying the current one
    pub async fn change_pin(
        &self,
        id: &UserId,
        current_pin: &str,
        new_pin: &str,
    ) -> Result<(), DomainError> {
        let mut user = self.get_required(id).await?;

        if !self.hasher.verify(current_pin, user.pin_hash()) {
            return Err(DomainError::credential("Current PIN is incorrect"));
        }

        validate_pin(new_pin).map_err(|e| DomainError::validation(e.to_string()))?;

        user.set_pin_hash(self.hasher.hash(new_pin)?);
        self.users.update(&user).await?;

        self.activities
            .record(Activity::new(id.clone(), "pin_change", "PIN updated"))
            .await?;

        Ok(())
    }

    /// Delete a user's own account, confirmed by their PIN
    pub async fn delete_account(&self, id: &UserId, pin: &str) -> Result<(), DomainError> {
        let user = self.get_required(id).await?;

        if !self.hasher.verify(pin, user.pin_hash()) {
            return Err(DomainError::credential("Invalid PIN"));
        }

        self.activities.delete_for_user(id).await?;
        self.users.delete(id).await?;

        info!(user_id = %id, "Account deleted by owner");

        Ok(())
    }

    /// Recent activity feed for a user, newest first
    pub async fn activities(
        &self,
        id: &UserId,
        limit: usize,
    ) -> Result<Vec<Activity>, DomainError> {
        self.activities.recent_for_user(id, limit).await
    }

    /// Top users by credit balance
    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, DomainError> {
        self.users.top_by_credits(limit).await
    }

    // Admin operations

    /// Get a user by ID
    pub async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.users.get(id).await
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.users.list().await
    }

    /// Number of registered users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.users.count().await
    }

    /// Create a user with an explicit balance and role (admin surface)
    pub async fn admin_create(
        &self,
        request: AdminCreateUserRequest,
    ) -> Result<User, DomainError> {
        let user = self
            .register(RegisterRequest {
                username: request.username,
                telegram_id: request.telegram_id,
                pin: request.pin,
                password: request.password,
                language: "en".to_string(),
            })
            .await?;

        if request.credits == 0 && !request.is_admin {
            return Ok(user);
        }

        let mut user = user;
        user.set_credits(request.credits);
        user.set_admin(request.is_admin);

        self.users.update(&user).await
    }

    /// Update a user's credits and admin flag (admin surface)
    pub async fn admin_update(
        &self,
        id: &UserId,
        request: AdminUpdateUserRequest,
    ) -> Result<User, DomainError> {
        let mut user = self.get_required(id).await?;

        if let Some(credits) = request.credits {
            user.set_credits(credits);
        }

        if let Some(is_admin) = request.is_admin {
            user.set_admin(is_admin);
        }

        self.users.update(&user).await
    }

    /// Flip a user's banned flag (admin surface)
    pub async fn toggle_ban(&self, id: &UserId) -> Result<User, DomainError> {
        let mut user = self.get_required(id).await?;

        user.toggle_banned();
        let user = self.users.update(&user).await?;

        info!(user_id = %id, banned = user.banned(), "Ban flag toggled");

        Ok(user)
    }

    /// Adjust a user's credit balance (admin surface)
    ///
    /// Removal clamps at zero; both directions append an activity entry.
    pub async fn adjust_credits(
        &self,
        id: &UserId,
        amount: i64,
        action: CreditAction,
    ) -> Result<User, DomainError> {
        if amount <= 0 {
            return Err(DomainError::validation("Amount must be positive"));
        }

        let mut user = self.get_required(id).await?;

        match action {
            CreditAction::Add => user.add_credits(amount),
            CreditAction::Remove => user.remove_credits(amount),
        }

        let user = self.users.update(&user).await?;

        self.activities
            .record(Activity::new(
                id.clone(),
                "credits_adjusted",
                format!("{} {} credits (balance: {})", action, amount, user.credits()),
            ))
            .await?;

        Ok(user)
    }

    /// Delete a user and their activity feed (admin surface)
    pub async fn admin_delete(&self, id: &UserId) -> Result<bool, DomainError> {
        self.activities.delete_for_user(id).await?;
        let deleted = self.users.delete(id).await?;

        if deleted {
            info!(user_id = %id, "User deleted by admin");
        }

        Ok(deleted)
    }

    async fn get_required(&self, id: &UserId) -> Result<User, DomainError> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::activity::InMemoryActivityRepository;
    use crate::infrastructure::security::ApiKeyGenerator;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    type TestService =
        UserService<InMemoryUserRepository, InMemoryActivityRepository, Argon2Hasher>;

    fn create_service() -> TestService {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryActivityRepository::new()),
            Arc::new(Argon2Hasher::new()),
        )
    }

    fn make_request(username: &str, telegram_id: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            telegram_id: telegram_id.to_string(),
            pin: "123456".to_string(),
            password: "hunter22".to_string(),
            language: "en".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_issues_formatted_key() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        assert_eq!(user.username(), "alice");
        assert!(ApiKeyGenerator::is_valid_format(user.api_key()));
        assert_eq!(user.credits(), 0);
        assert!(!user.is_admin());
    }

    #[tokio::test]
    async fn test_register_records_activity() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        let feed = service.activities(user.id(), 10).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].action(), "register");
    }

    #[tokio::test]
    async fn test_register_rejects_bad_telegram_id() {
        let service = create_service();

        let result = service.register(make_request("alice", "12ab")).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_pin() {
        let service = create_service();

        let mut request = make_request("alice", "111");
        request.pin = "12345".to_string();

        let result = service.register(request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let service = create_service();

        service.register(make_request("alice", "111")).await.unwrap();

        let result = service.register(make_request("alice", "222")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_register_duplicate_telegram_id() {
        let service = create_service();

        service.register(make_request("alice", "111")).await.unwrap();

        let result = service.register(make_request("bob", "111")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_login_with_api_key() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        let logged_in = service.login(user.api_key()).await.unwrap();
        assert_eq!(logged_in.id(), user.id());
        assert!(logged_in.last_login_at().is_some());
    }

    #[tokio::test]
    async fn test_login_unknown_key() {
        let service = create_service();

        let result = service.login("ZZZZ-ZZZZ-ZZZZ-ZZZZ").await;
        assert!(matches!(result, Err(DomainError::Credential { .. })));
    }

    #[tokio::test]
    async fn test_login_banned_user() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();
        service.toggle_ban(user.id()).await.unwrap();

        let result = service.login(user.api_key()).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_recover_key() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        let key = service.recover_key("111", "123456").await.unwrap();
        assert_eq!(key, user.api_key());
    }

    #[tokio::test]
    async fn test_recover_key_wrong_pin() {
        let service = create_service();

        service.register(make_request("alice", "111")).await.unwrap();

        let result = service.recover_key("111", "654321").await;
        assert!(matches!(result, Err(DomainError::Credential { .. })));
    }

    #[tokio::test]
    async fn test_recover_key_unknown_telegram_id() {
        let service = create_service();

        let result = service.recover_key("999", "123456").await;
        assert!(matches!(result, Err(DomainError::Credential { .. })));
    }

    #[tokio::test]
    async fn test_reset_api_key_first_time() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();
        let old_key = user.api_key().to_string();

        let outcome = service.reset_api_key(user.id()).await.unwrap();

        match outcome {
            ApiKeyResetOutcome::Reset { api_key } => {
                assert_ne!(api_key, old_key);
                assert!(ApiKeyGenerator::is_valid_format(&api_key));
            }
            ApiKeyResetOutcome::OnCooldown { .. } => panic!("first reset should be allowed"),
        }
    }

    #[tokio::test]
    async fn test_reset_api_key_cooldown() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        service.reset_api_key(user.id()).await.unwrap();

        // Second reset right away lands inside the 30-day cooldown
        let outcome = service.reset_api_key(user.id()).await.unwrap();
        match outcome {
            ApiKeyResetOutcome::OnCooldown { days_left } => assert!(days_left >= 1),
            ApiKeyResetOutcome::Reset { .. } => panic!("reset should be on cooldown"),
        }
    }

    #[tokio::test]
    async fn test_change_password() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        service
            .change_password(user.id(), "hunter22", "new_password")
            .await
            .unwrap();

        let result = service
            .change_password(user.id(), "hunter22", "another")
            .await;
        assert!(matches!(result, Err(DomainError::Credential { .. })));

        service
            .change_password(user.id(), "new_password", "third_password")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_change_pin() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        service.change_pin(user.id(), "123456", "654321").await.unwrap();

        // Recovery now requires the new PIN
        assert!(service.recover_key("111", "123456").await.is_err());
        assert!(service.recover_key("111", "654321").await.is_ok());
    }

    #[tokio::test]
    async fn test_change_pin_rejects_invalid_new_pin() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        let result = service.change_pin(user.id(), "123456", "12").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_delete_account_requires_pin() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        let result = service.delete_account(user.id(), "000000").await;
        assert!(matches!(result, Err(DomainError::Credential { .. })));

        service.delete_account(user.id(), "123456").await.unwrap();
        assert!(service.get(user.id()).await.unwrap().is_none());

        let feed = service.activities(user.id(), 10).await.unwrap();
        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn test_admin_create_with_credits_and_role() {
        let service = create_service();

        let user = service
            .admin_create(AdminCreateUserRequest {
                username: "root".to_string(),
                telegram_id: "999".to_string(),
                pin: "123456".to_string(),
                password: "adminpass".to_string(),
                credits: 100,
                is_admin: true,
            })
            .await
            .unwrap();

        assert_eq!(user.credits(), 100);
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_admin_update() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        let updated = service
            .admin_update(
                user.id(),
                AdminUpdateUserRequest {
                    credits: Some(77),
                    is_admin: Some(true),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.credits(), 77);
        assert!(updated.is_admin());
    }

    #[tokio::test]
    async fn test_toggle_ban() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        let banned = service.toggle_ban(user.id()).await.unwrap();
        assert!(banned.banned());

        let unbanned = service.toggle_ban(user.id()).await.unwrap();
        assert!(!unbanned.banned());
    }

    #[tokio::test]
    async fn test_adjust_credits() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        let after_add = service
            .adjust_credits(user.id(), 50, CreditAction::Add)
            .await
            .unwrap();
        assert_eq!(after_add.credits(), 50);

        let after_remove = service
            .adjust_credits(user.id(), 80, CreditAction::Remove)
            .await
            .unwrap();
        assert_eq!(after_remove.credits(), 0);
    }

    #[tokio::test]
    async fn test_adjust_credits_rejects_non_positive() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        let result = service.adjust_credits(user.id(), 0, CreditAction::Add).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_admin_delete() {
        let service = create_service();

        let user = service.register(make_request("alice", "111")).await.unwrap();

        assert!(service.admin_delete(user.id()).await.unwrap());
        assert!(!service.admin_delete(user.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_leaderboard() {
        let service = create_service();

        let alice = service.register(make_request("alice", "111")).await.unwrap();
        let bob = service.register(make_request("bob", "222")).await.unwrap();

        service
            .adjust_credits(alice.id(), 10, CreditAction::Add)
            .await
            .unwrap();
        service
            .adjust_credits(bob.id(), 30, CreditAction::Add)
            .await
            .unwrap();

        let top = service.leaderboard(10).await.unwrap();

        assert_eq!(top[0].username, "bob");
        assert_eq!(top[0].credits, 30);
    }
}
