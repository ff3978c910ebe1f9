//! User representation shared by the auth, account and admin endpoints

use serde::Serialize;

use crate::domain::user::User;

/// User profile safe to expose over the API
///
/// Credential hashes never appear here; the API key does, since the
/// dashboard shows it to its owner.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub telegram_id: String,
    pub api_key: String,
    pub credits: i64,
    pub is_admin: bool,
    pub banned: bool,
    pub language: String,
    pub last_api_key_reset: Option<String>,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().as_str().to_string(),
            username: user.username().to_string(),
            telegram_id: user.telegram_id().to_string(),
            api_key: user.api_key().to_string(),
            credits: user.credits(),
            is_admin: user.is_admin(),
            banned: user.banned(),
            language: user.language().to_string(),
            last_api_key_reset: user.last_api_key_reset().map(|t| t.to_rfc3339()),
            created_at: user.created_at().to_rfc3339(),
            last_login_at: user.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;

    #[test]
    fn test_response_omits_credential_hashes() {
        let user = User::new(
            UserId::generate(),
            "alice",
            "111",
            "pin_hash_value",
            "password_hash_value",
            "AAAA-AAAA-AAAA-AAAA",
            "en",
        );

        let json = serde_json::to_string(&UserResponse::from(&user)).unwrap();

        assert!(json.contains("alice"));
        assert!(json.contains("AAAA-AAAA-AAAA-AAAA"));
        assert!(!json.contains("pin_hash_value"));
        assert!(!json.contains("password_hash_value"));
    }
}
