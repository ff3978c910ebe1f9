//! Activity domain model

pub mod entity;
pub mod repository;

pub use entity::Activity;
pub use repository::ActivityRepository;
