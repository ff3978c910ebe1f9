//! Account Portal API
//!
//! Account management service with:
//! - Telegram-ID + PIN registration and key recovery
//! - API-key authentication with rate limiting and permanent bans
//! - A credits ledger with a public leaderboard
//! - An admin surface for user management

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use rand::Rng;
use tracing::info;

use api::state::{AppState, UserServiceTrait};
use infrastructure::activity::PostgresActivityRepository;
use infrastructure::security::RateLimiter;
use infrastructure::user::{
    AdminCreateUserRequest, Argon2Hasher, PostgresUserRepository, UserService,
};

/// Create the application state with all services initialized
pub async fn create_app_state() -> anyhow::Result<AppState> {
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

    info!("Connecting to PostgreSQL...");
    let pg_pool = sqlx::PgPool::connect(&database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;
    info!("PostgreSQL connection established");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let activity_repository = Arc::new(PostgresActivityRepository::new(pg_pool));
    let hasher = Arc::new(Argon2Hasher::new());

    let user_service: Arc<dyn UserServiceTrait> = Arc::new(UserService::new(
        user_repository,
        activity_repository,
        hasher,
    ));

    create_initial_admin_user(user_service.as_ref()).await?;

    Ok(AppState::new(user_service, Arc::new(RateLimiter::new())))
}

/// Create an initial admin user if no users exist
async fn create_initial_admin_user(user_service: &dyn UserServiceTrait) -> anyhow::Result<()> {
    if user_service.count().await? > 0 {
        return Ok(());
    }

    let (password, is_default) = match std::env::var("ADMIN_DEFAULT_PASSWORD") {
        Ok(p) if !p.is_empty() => (p, true),
        _ => (generate_random_password(), false),
    };
    let pin = generate_random_pin();

    let user = user_service
        .admin_create(AdminCreateUserRequest {
            username: "admin".to_string(),
            telegram_id: "0".to_string(),
            pin: pin.clone(),
            password: password.clone(),
            credits: 0,
            is_admin: true,
        })
        .await?;

    info!("===========================================");
    info!("Initial admin user created!");
    info!("Username: admin");

    if is_default {
        info!("Password: (set via ADMIN_DEFAULT_PASSWORD)");
    } else {
        info!("Password: {}", password);
    }

    info!("PIN: {}", pin);
    info!("API key: {}", user.api_key());
    info!("Please change these credentials after first login.");
    info!("===========================================");

    Ok(())
}

/// Generate a random password for the initial admin user
fn generate_random_password() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Generate a random 6-digit PIN for the initial admin user
fn generate_random_pin() -> String {
    let mut rng = rand::thread_rng();

    (0..6).map(|_| rng.gen_range(0..10).to_string()).collect()
}
