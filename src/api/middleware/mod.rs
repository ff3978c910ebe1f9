//! Request middleware: authentication, client IP resolution, security headers

pub mod admin_auth;
pub mod auth;
pub mod client_ip;
pub mod security;

pub use admin_auth::RequireAdmin;
pub use auth::RequireUser;
pub use client_ip::ClientIp;
pub use security::security_headers_middleware;
