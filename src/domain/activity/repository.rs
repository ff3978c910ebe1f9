//! Activity repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::Activity;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for activity storage
#[async_trait]
pub trait ActivityRepository: Send + Sync + Debug {
    /// Append an activity entry
    async fn record(&self, activity: Activity) -> Result<Activity, DomainError>;

    /// Most recent activities for a user, newest first
    async fn recent_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Activity>, DomainError>;

    /// Delete all activities for a user (account deletion)
    async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, DomainError>;
}
