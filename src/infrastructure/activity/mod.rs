//! Activity infrastructure: repository implementations

pub mod postgres_repository;
pub mod repository;

pub use postgres_repository::PostgresActivityRepository;
pub use repository::InMemoryActivityRepository;
