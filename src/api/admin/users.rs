//! User management admin endpoints

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, UserResponse};
use crate::domain::user::UserId;
use crate::infrastructure::user::{
    AdminCreateUserRequest, AdminUpdateUserRequest, CreditAction,
};

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::new(raw).map_err(|e| ApiError::bad_request(e.to_string()).with_param("user_id"))
}

/// Request to create a user with an explicit balance and role
#[derive(Debug, Deserialize)]
pub struct CreateUserApiRequest {
    pub username: String,
    pub telegram_id: String,
    pub pin: String,
    pub password: String,
    #[serde(default)]
    pub credits: i64,
    #[serde(default)]
    pub is_admin: bool,
}

/// Request to update a user's credits and role
#[derive(Debug, Deserialize)]
pub struct UpdateUserApiRequest {
    pub credits: Option<i64>,
    pub is_admin: Option<bool>,
}

/// Request to adjust a user's credit balance
#[derive(Debug, Deserialize)]
pub struct AdjustCreditsApiRequest {
    pub amount: i64,
    pub action: CreditActionApi,
}

/// Direction of a credit adjustment
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditActionApi {
    Add,
    Remove,
}

impl From<CreditActionApi> for CreditAction {
    fn from(action: CreditActionApi) -> Self {
        match action {
            CreditActionApi::Add => CreditAction::Add,
            CreditActionApi::Remove => CreditAction::Remove,
        }
    }
}

/// List users response
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<ListUsersResponse>, ApiError> {
    debug!("Admin listing all users");

    let users = state.user_service.list().await.map_err(ApiError::from)?;

    let user_responses: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    let total = user_responses.len();

    Ok(Json(ListUsersResponse {
        users: user_responses,
        total,
    }))
}

/// POST /admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(request): Json<CreateUserApiRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(username = %request.username, "Admin creating user");

    let user = state
        .user_service
        .admin_create(AdminCreateUserRequest {
            username: request.username,
            telegram_id: request.telegram_id,
            pin: request.pin,
            password: request.password,
            credits: request.credits,
            is_admin: request.is_admin,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// GET /admin/users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_user_id(&user_id)?;

    let user = state
        .user_service
        .get(&id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("User '{}' not found", user_id)))?;

    Ok(Json(UserResponse::from(&user)))
}

/// PUT /admin/users/:user_id
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "Admin updating user");

    let id = parse_user_id(&user_id)?;

    let user = state
        .user_service
        .admin_update(
            &id,
            AdminUpdateUserRequest {
                credits: request.credits,
                is_admin: request.is_admin,
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// POST /admin/users/:user_id/ban
pub async fn toggle_ban(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, "Admin toggling ban");

    let id = parse_user_id(&user_id)?;

    let user = state
        .user_service
        .toggle_ban(&id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// POST /admin/users/:user_id/credits
pub async fn adjust_credits(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(user_id): Path<String>,
    Json(request): Json<AdjustCreditsApiRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = %user_id, amount = request.amount, "Admin adjusting credits");

    let id = parse_user_id(&user_id)?;

    let user = state
        .user_service
        .adjust_credits(&id, request.amount, request.action.into())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /admin/users/:user_id
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(user_id = %user_id, "Admin deleting user");

    let id = parse_user_id(&user_id)?;

    let deleted = state
        .user_service
        .admin_delete(&id)
        .await
        .map_err(ApiError::from)?;

    if !deleted {
        return Err(ApiError::not_found(format!("User '{}' not found", user_id)));
    }

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": user_id
    })))
}
