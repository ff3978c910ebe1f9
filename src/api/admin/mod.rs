//! Admin API endpoints for user management

pub mod users;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/{user_id}", get(users::get_user))
        .route("/users/{user_id}", put(users::update_user))
        .route("/users/{user_id}", delete(users::delete_user))
        .route("/users/{user_id}/ban", post(users::toggle_ban))
        .route("/users/{user_id}/credits", post(users::adjust_credits))
}
