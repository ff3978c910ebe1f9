//! User validation rules

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID cannot be empty")]
    EmptyId,

    #[error("User ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("User ID contains invalid character: '{0}'. Only alphanumeric characters and hyphens are allowed")]
    InvalidIdCharacter(char),

    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("Username contains invalid character: '{0}'. Only alphanumeric characters, underscores, and hyphens are allowed")]
    InvalidUsernameCharacter(char),

    #[error("Telegram ID cannot be empty")]
    EmptyTelegramId,

    #[error("Telegram ID exceeds maximum length of {0} digits")]
    TelegramIdTooLong(usize),

    #[error("Telegram ID must contain only digits")]
    TelegramIdNotNumeric,

    #[error("PIN must be exactly {0} digits")]
    InvalidPin(usize),

    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),
}

const MAX_USER_ID_LENGTH: usize = 64;
const MAX_USERNAME_LENGTH: usize = 30;
const MAX_TELEGRAM_ID_LENGTH: usize = 15;
const PIN_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 50;

/// Validate a user ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters (UUID strings fit comfortably)
/// - Only alphanumeric characters and hyphens
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    if id.len() > MAX_USER_ID_LENGTH {
        return Err(UserValidationError::IdTooLong(MAX_USER_ID_LENGTH));
    }

    for c in id.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(UserValidationError::InvalidIdCharacter(c));
        }
    }

    Ok(())
}

/// Validate a username
///
/// Rules:
/// - Cannot be empty
/// - Maximum 30 characters
/// - Only alphanumeric characters, underscores, and hyphens
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    for c in username.chars() {
        if !c.is_ascii_alphanumeric() && c != '_' && c != '-' {
            return Err(UserValidationError::InvalidUsernameCharacter(c));
        }
    }

    Ok(())
}

/// Validate a Telegram ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 15 digits
/// - Digits only
pub fn validate_telegram_id(telegram_id: &str) -> Result<(), UserValidationError> {
    if telegram_id.is_empty() {
        return Err(UserValidationError::EmptyTelegramId);
    }

    if telegram_id.len() > MAX_TELEGRAM_ID_LENGTH {
        return Err(UserValidationError::TelegramIdTooLong(
            MAX_TELEGRAM_ID_LENGTH,
        ));
    }

    if !telegram_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(UserValidationError::TelegramIdNotNumeric);
    }

    Ok(())
}

/// Validate a PIN: exactly 6 digits
pub fn validate_pin(pin: &str) -> Result<(), UserValidationError> {
    if pin.len() != PIN_LENGTH || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(UserValidationError::InvalidPin(PIN_LENGTH));
    }

    Ok(())
}

/// Validate a password
///
/// Rules:
/// - Cannot be empty
/// - Maximum 50 characters
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}
