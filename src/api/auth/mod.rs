//! Public authentication endpoints
//!
//! Registration, API-key login and key recovery. All three are rate limited
//! by client IP before any credentials are inspected.

use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::ClientIp;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, UserResponse};
use crate::infrastructure::security::RateLimitAction;
use crate::infrastructure::user::RegisterRequest;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/recover-key", post(recover_key))
}

fn default_language() -> String {
    "en".to_string()
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterApiRequest {
    pub username: String,
    pub telegram_id: String,
    pub pin: String,
    pub password: String,
    #[serde(default = "default_language")]
    pub language: String,
}

/// Registration response; the API key is shown here exactly once
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub api_key: String,
    pub user: UserResponse,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub api_key: String,
}

/// Key recovery request
#[derive(Debug, Deserialize)]
pub struct RecoverKeyRequest {
    pub telegram_id: String,
    pub pin: String,
}

/// Key recovery response
#[derive(Debug, Serialize)]
pub struct RecoverKeyResponse {
    pub api_key: String,
}

/// Register a new account
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(request): Json<RegisterApiRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    if !state.rate_limiter.check(&ip, RateLimitAction::Register) {
        return Err(ApiError::rate_limited(
            "Too many registration attempts. Try again later.",
        ));
    }

    debug!(username = %request.username, "Registration attempt");

    let user = state
        .user_service
        .register(RegisterRequest {
            username: request.username,
            telegram_id: request.telegram_id,
            pin: request.pin,
            password: request.password,
            language: request.language,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Json(RegisterResponse {
        api_key: user.api_key().to_string(),
        user: UserResponse::from(&user),
    }))
}

/// Login with an API key
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if !state.rate_limiter.check(&ip, RateLimitAction::Login) {
        return Err(ApiError::rate_limited(
            "Too many login attempts. Try again later.",
        ));
    }

    let user = state
        .user_service
        .login(&request.api_key)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// Recover an API key with a Telegram ID + PIN pair
///
/// POST /auth/recover-key
pub async fn recover_key(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(request): Json<RecoverKeyRequest>,
) -> Result<Json<RecoverKeyResponse>, ApiError> {
    if !state.rate_limiter.check(&ip, RateLimitAction::Login) {
        return Err(ApiError::rate_limited(
            "Too many recovery attempts. Try again later.",
        ));
    }

    let api_key = state
        .user_service
        .recover_key(&request.telegram_id, &request.pin)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(RecoverKeyResponse { api_key }))
}
