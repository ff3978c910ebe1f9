//! Infrastructure layer - repositories, services and runtime plumbing

pub mod activity;
pub mod logging;
pub mod security;
pub mod user;
