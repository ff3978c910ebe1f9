//! Admin authentication middleware
//!
//! Requires a valid API key belonging to a user with the admin flag.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;

use super::auth::RequireUser;

/// Extractor that requires an authenticated admin user
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(ApiError::forbidden("Admin access required"));
        }

        debug!(user_id = %user.id(), "Admin access granted");

        Ok(RequireAdmin(user))
    }
}
