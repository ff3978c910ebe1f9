//! User infrastructure: repositories, credential hashing and service

pub mod password;
pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use password::{Argon2Hasher, CredentialHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{
    AdminCreateUserRequest, AdminUpdateUserRequest, ApiKeyResetOutcome, CreditAction,
    RegisterRequest, UserService,
};
