//! Domain layer - Core business logic and entities

pub mod activity;
pub mod error;
pub mod user;

pub use activity::{Activity, ActivityRepository};
pub use error::DomainError;
pub use user::{LeaderboardEntry, User, UserId, UserRepository};
