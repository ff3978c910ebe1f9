//! API key generation and reset cooldown
//!
//! Keys are formatted as four dash-separated 4-character uppercase
//! alphanumeric segments (`XXXX-XXXX-XXXX-XXXX`). The format is guaranteed;
//! global uniqueness is enforced by the store's unique constraint on the
//! api_key column.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

const SEGMENT_COUNT: usize = 4;
const SEGMENT_LENGTH: usize = 4;
const KEY_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Days a user must wait between API key resets
pub const API_KEY_RESET_COOLDOWN_DAYS: i64 = 30;

/// Generator for portal API keys
#[derive(Debug, Clone, Default)]
pub struct ApiKeyGenerator;

impl ApiKeyGenerator {
    /// Create a new generator
    pub fn new() -> Self {
        Self
    }

    /// Generate a key in `XXXX-XXXX-XXXX-XXXX` format
    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();

        let segments: Vec<String> = (0..SEGMENT_COUNT)
            .map(|_| {
                (0..SEGMENT_LENGTH)
                    .map(|_| KEY_CHARSET[rng.gen_range(0..KEY_CHARSET.len())] as char)
                    .collect()
            })
            .collect();

        segments.join("-")
    }

    /// Check that a string matches the generated key format
    pub fn is_valid_format(key: &str) -> bool {
        let segments: Vec<&str> = key.split('-').collect();

        segments.len() == SEGMENT_COUNT
            && segments.iter().all(|s| {
                s.len() == SEGMENT_LENGTH
                    && s.bytes().all(|b| KEY_CHARSET.contains(&b))
            })
    }
}

/// Whether an API key may be reset, and the days remaining if not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetEligibility {
    pub can_reset: bool,
    pub days_left: i64,
}

/// Compute reset eligibility from the last reset time
///
/// A user who has never reset is always eligible. Otherwise the 30-day
/// cooldown must have elapsed; `days_left` reports the remaining wait
/// rounded up to whole days, and is 0 once eligible.
pub fn reset_eligibility(last_reset: Option<DateTime<Utc>>) -> ResetEligibility {
    let Some(last_reset) = last_reset else {
        return ResetEligibility {
            can_reset: true,
            days_left: 0,
        };
    };

    let cooldown = Duration::days(API_KEY_RESET_COOLDOWN_DAYS);
    let remaining = cooldown - (Utc::now() - last_reset);

    if remaining <= Duration::zero() {
        ResetEligibility {
            can_reset: true,
            days_left: 0,
        }
    } else {
        ResetEligibility {
            can_reset: false,
            days_left: (remaining.num_seconds() + 86_399) / 86_400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_format() {
        let generator = ApiKeyGenerator::new();

        for _ in 0..100 {
            let key = generator.generate();

            assert_eq!(key.len(), 19);
            assert!(ApiKeyGenerator::is_valid_format(&key), "bad key: {}", key);
        }
    }

    #[test]
    fn test_generated_keys_differ() {
        let generator = ApiKeyGenerator::new();

        let a = generator.generate();
        let b = generator.generate();

        assert_ne!(a, b);
    }

    #[test]
    fn test_format_validation() {
        assert!(ApiKeyGenerator::is_valid_format("ABCD-1234-WXYZ-0000"));
        assert!(!ApiKeyGenerator::is_valid_format("abcd-1234-wxyz-0000"));
        assert!(!ApiKeyGenerator::is_valid_format("ABCD-1234-WXYZ"));
        assert!(!ApiKeyGenerator::is_valid_format("ABCD-1234-WXYZ-00000"));
        assert!(!ApiKeyGenerator::is_valid_format("ABCD_1234_WXYZ_0000"));
        assert!(!ApiKeyGenerator::is_valid_format(""));
    }

    #[test]
    fn test_never_reset_is_eligible() {
        let eligibility = reset_eligibility(None);

        assert!(eligibility.can_reset);
        assert_eq!(eligibility.days_left, 0);
    }

    #[test]
    fn test_reset_within_cooldown() {
        let last_reset = Utc::now() - Duration::days(29);
        let eligibility = reset_eligibility(Some(last_reset));

        assert!(!eligibility.can_reset);
        assert!(eligibility.days_left >= 1);
    }

    #[test]
    fn test_reset_after_cooldown() {
        let last_reset = Utc::now() - Duration::days(31);
        let eligibility = reset_eligibility(Some(last_reset));

        assert!(eligibility.can_reset);
        assert_eq!(eligibility.days_left, 0);
    }

    #[test]
    fn test_days_left_rounds_up() {
        // 29.5 days elapsed leaves half a day, reported as 1
        let last_reset = Utc::now() - Duration::days(29) - Duration::hours(12);
        let eligibility = reset_eligibility(Some(last_reset));

        assert!(!eligibility.can_reset);
        assert_eq!(eligibility.days_left, 1);
    }
}
