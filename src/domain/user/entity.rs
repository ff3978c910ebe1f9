//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_user_id, UserValidationError};

/// User identifier - alphanumeric + hyphens, max 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        validate_user_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh random UserId
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// All stored fields of a user, used by repositories to rebuild the entity
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub telegram_id: String,
    pub pin_hash: String,
    pub password_hash: String,
    pub api_key: String,
    pub credits: i64,
    pub is_admin: bool,
    pub banned: bool,
    pub language: String,
    pub last_api_key_reset: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// User account entity
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique identifier for the user
    id: UserId,
    /// Display name, unique across the portal
    username: String,
    /// Telegram identifier, digits only, unique
    telegram_id: String,
    /// Argon2 PIN hash - never exposed in serialization
    #[serde(skip_serializing)]
    pin_hash: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    /// Bearer credential used in place of session tokens
    api_key: String,
    /// Credit balance
    credits: i64,
    /// Whether the user can access the admin surface
    is_admin: bool,
    /// Banned users fail login
    banned: bool,
    /// Preferred language code
    language: String,
    /// When the API key was last reset (cooldown anchor)
    #[serde(skip_serializing_if = "Option::is_none")]
    last_api_key_reset: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user with a zero credit balance
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        telegram_id: impl Into<String>,
        pin_hash: impl Into<String>,
        password_hash: impl Into<String>,
        api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            username: username.into(),
            telegram_id: telegram_id.into(),
            pin_hash: pin_hash.into(),
            password_hash: password_hash.into(),
            api_key: api_key.into(),
            credits: 0,
            is_admin: false,
            banned: false,
            language: language.into(),
            last_api_key_reset: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Rebuild a user from stored fields
    pub fn from_record(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            telegram_id: record.telegram_id,
            pin_hash: record.pin_hash,
            password_hash: record.password_hash,
            api_key: record.api_key,
            credits: record.credits,
            is_admin: record.is_admin,
            banned: record.banned,
            language: record.language,
            last_api_key_reset: record.last_api_key_reset,
            created_at: record.created_at,
            updated_at: record.updated_at,
            last_login_at: record.last_login_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn telegram_id(&self) -> &str {
        &self.telegram_id
    }

    pub fn pin_hash(&self) -> &str {
        &self.pin_hash
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn credits(&self) -> i64 {
        self.credits
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn banned(&self) -> bool {
        self.banned
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn last_api_key_reset(&self) -> Option<DateTime<Utc>> {
        self.last_api_key_reset
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    /// Check if the user may log in
    pub fn can_login(&self) -> bool {
        !self.banned
    }

    // Mutators

    /// Replace the API key and record the reset time
    pub fn reset_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = api_key.into();
        self.last_api_key_reset = Some(Utc::now());
        self.touch();
    }

    /// Update the password hash
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    /// Update the PIN hash
    pub fn set_pin_hash(&mut self, pin_hash: impl Into<String>) {
        self.pin_hash = pin_hash.into();
        self.touch();
    }

    /// Set the credit balance directly (admin edit)
    pub fn set_credits(&mut self, credits: i64) {
        self.credits = credits;
        self.touch();
    }

    /// Add credits to the balance
    pub fn add_credits(&mut self, amount: i64) {
        self.credits = self.credits.saturating_add(amount);
        self.touch();
    }

    /// Remove credits from the balance, never going below zero
    pub fn remove_credits(&mut self, amount: i64) {
        self.credits = (self.credits - amount).max(0);
        self.touch();
    }

    /// Grant or revoke admin access
    pub fn set_admin(&mut self, is_admin: bool) {
        self.is_admin = is_admin;
        self.touch();
    }

    /// Flip the banned flag
    pub fn toggle_banned(&mut self) {
        self.banned = !self.banned;
        self.touch();
    }

    /// Record a login
    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(username: &str, telegram_id: &str) -> User {
        User::new(
            UserId::generate(),
            username,
            telegram_id,
            "pin_hash",
            "password_hash",
            "AAAA-BBBB-CCCC-DDDD",
            "en",
        )
    }

    #[test]
    fn test_user_id_valid() {
        let id = UserId::new("admin").unwrap();
        assert_eq!(id.as_str(), "admin");
    }

    #[test]
    fn test_user_id_generate_is_valid() {
        let id = UserId::generate();
        assert!(UserId::new(id.as_str()).is_ok());
    }

    #[test]
    fn test_user_id_invalid() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("user name").is_err());
    }

    #[test]
    fn test_user_creation_defaults() {
        let user = create_test_user("alice", "12345");

        assert_eq!(user.username(), "alice");
        assert_eq!(user.telegram_id(), "12345");
        assert_eq!(user.credits(), 0);
        assert!(!user.is_admin());
        assert!(!user.banned());
        assert!(user.can_login());
        assert!(user.last_api_key_reset().is_none());
        assert!(user.last_login_at().is_none());
    }

    #[test]
    fn test_reset_api_key_records_timestamp() {
        let mut user = create_test_user("alice", "12345");

        user.reset_api_key("EEEE-FFFF-GGGG-HHHH");

        assert_eq!(user.api_key(), "EEEE-FFFF-GGGG-HHHH");
        assert!(user.last_api_key_reset().is_some());
    }

    #[test]
    fn test_credits_never_negative() {
        let mut user = create_test_user("alice", "12345");

        user.add_credits(10);
        assert_eq!(user.credits(), 10);

        user.remove_credits(25);
        assert_eq!(user.credits(), 0);
    }

    #[test]
    fn test_toggle_banned_blocks_login() {
        let mut user = create_test_user("alice", "12345");

        user.toggle_banned();
        assert!(user.banned());
        assert!(!user.can_login());

        user.toggle_banned();
        assert!(user.can_login());
    }

    #[test]
    fn test_record_login() {
        let mut user = create_test_user("alice", "12345");

        user.record_login();
        assert!(user.last_login_at().is_some());
    }

    #[test]
    fn test_serialization_excludes_hashes() {
        let user = create_test_user("alice", "12345");

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("pin_hash"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("alice"));
    }

    #[test]
    fn test_from_record_round_trip() {
        let user = create_test_user("alice", "12345");

        let record = UserRecord {
            id: user.id().clone(),
            username: user.username().to_string(),
            telegram_id: user.telegram_id().to_string(),
            pin_hash: user.pin_hash().to_string(),
            password_hash: user.password_hash().to_string(),
            api_key: user.api_key().to_string(),
            credits: 42,
            is_admin: true,
            banned: false,
            language: user.language().to_string(),
            last_api_key_reset: None,
            created_at: user.created_at(),
            updated_at: user.updated_at(),
            last_login_at: None,
        };

        let restored = User::from_record(record);
        assert_eq!(restored.id(), user.id());
        assert_eq!(restored.credits(), 42);
        assert!(restored.is_admin());
    }
}
