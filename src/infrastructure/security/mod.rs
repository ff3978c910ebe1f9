//! Security utilities: attempt rate limiting and API key credentials

pub mod api_key;
pub mod rate_limiter;

pub use api_key::{reset_eligibility, ApiKeyGenerator, ResetEligibility};
pub use rate_limiter::{RateLimitAction, RateLimiter};
