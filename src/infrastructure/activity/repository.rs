//! In-memory activity repository implementation

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::activity::{Activity, ActivityRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of ActivityRepository
#[derive(Debug, Default)]
pub struct InMemoryActivityRepository {
    activities: Arc<RwLock<Vec<Activity>>>,
}

impl InMemoryActivityRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivityRepository {
    async fn record(&self, activity: Activity) -> Result<Activity, DomainError> {
        let mut activities = self.activities.write().await;
        activities.push(activity.clone());
        Ok(activity)
    }

    async fn recent_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Activity>, DomainError> {
        let activities = self.activities.read().await;

        let mut result: Vec<Activity> = activities
            .iter()
            .filter(|a| a.user_id() == user_id)
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        result.truncate(limit);

        Ok(result)
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let mut activities = self.activities.write().await;
        let before = activities.len();
        activities.retain(|a| a.user_id() != user_id);
        Ok((before - activities.len()) as u64)
    }
}
