//! User domain model

pub mod entity;
pub mod repository;
pub mod validation;

pub use entity::{User, UserId, UserRecord};
pub use repository::{LeaderboardEntry, UserRepository};
pub use validation::{
    validate_password, validate_pin, validate_telegram_id, validate_user_id, validate_username,
    UserValidationError,
};
