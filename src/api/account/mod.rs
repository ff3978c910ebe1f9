//! Authenticated account endpoints
//!
//! Everything here operates on the user identified by the API key in the
//! request headers.

use axum::{
    extract::State,
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, UserResponse};
use crate::domain::user::LeaderboardEntry;
use crate::infrastructure::user::ApiKeyResetOutcome;

/// Number of activity entries shown on the dashboard
const ACTIVITY_FEED_LIMIT: usize = 10;

/// Number of leaderboard rows
const LEADERBOARD_LIMIT: usize = 10;

/// Create the account router
pub fn create_account_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/api-key/reset", post(reset_api_key))
        .route("/password", put(change_password))
        .route("/pin", put(change_pin))
        .route("/", delete(delete_account))
        .route("/activities", get(activities))
        .route("/leaderboard", get(leaderboard))
}

/// GET /account/me
pub async fn me(RequireUser(user): RequireUser) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(UserResponse::from(&user)))
}

/// API key reset response
#[derive(Debug, Serialize)]
pub struct ResetApiKeyResponse {
    pub api_key: String,
}

/// POST /account/api-key/reset
pub async fn reset_api_key(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ResetApiKeyResponse>, ApiError> {
    debug!(user_id = %user.id(), "API key reset requested");

    let outcome = state
        .user_service
        .reset_api_key(user.id())
        .await
        .map_err(ApiError::from)?;

    match outcome {
        ApiKeyResetOutcome::Reset { api_key } => Ok(Json(ResetApiKeyResponse { api_key })),
        ApiKeyResetOutcome::OnCooldown { days_left } => Err(ApiError::bad_request(format!(
            "API key was reset recently. Try again in {} day(s).",
            days_left
        ))
        .with_code("reset_cooldown")),
    }
}

/// Password change request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// PUT /account/password
pub async fn change_password(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .user_service
        .change_password(user.id(), &request.current_password, &request.new_password)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({ "updated": true })))
}

/// PIN change request
#[derive(Debug, Deserialize)]
pub struct ChangePinRequest {
    pub current_pin: String,
    pub new_pin: String,
}

/// PUT /account/pin
pub async fn change_pin(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<ChangePinRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .user_service
        .change_pin(user.id(), &request.current_pin, &request.new_pin)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({ "updated": true })))
}

/// Account deletion request, confirmed by PIN
#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub pin: String,
}

/// DELETE /account
pub async fn delete_account(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<DeleteAccountRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .user_service
        .delete_account(user.id(), &request.pin)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Single activity feed entry
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub action: String,
    pub details: String,
    pub created_at: String,
}

/// Activity feed response
#[derive(Debug, Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivityResponse>,
}

/// GET /account/activities
pub async fn activities(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<ActivitiesResponse>, ApiError> {
    let entries = state
        .user_service
        .activities(user.id(), ACTIVITY_FEED_LIMIT)
        .await
        .map_err(ApiError::from)?;

    let activities = entries
        .iter()
        .map(|a| ActivityResponse {
            action: a.action().to_string(),
            details: a.details().to_string(),
            created_at: a.created_at().to_rfc3339(),
        })
        .collect();

    Ok(Json(ActivitiesResponse { activities }))
}

/// Leaderboard response
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub top_users: Vec<LeaderboardEntry>,
}

/// GET /account/leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let top_users = state
        .user_service
        .leaderboard(LEADERBOARD_LIMIT)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(LeaderboardResponse { top_users }))
}
