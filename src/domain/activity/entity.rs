//! Activity entity - per-user audit feed entries

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::user::UserId;

/// A single entry in a user's activity feed
#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    id: String,
    user_id: UserId,
    action: String,
    details: String,
    created_at: DateTime<Utc>,
}

impl Activity {
    /// Create a new activity entry timestamped now
    pub fn new(user_id: UserId, action: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            action: action.into(),
            details: details.into(),
            created_at: Utc::now(),
        }
    }

    /// Rebuild an activity from stored fields
    pub fn from_parts(
        id: String,
        user_id: UserId,
        action: String,
        details: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            action,
            details,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
