//! Fixed-window attempt limiter with a permanent ban list
//!
//! Tracks login/registration attempts per client key (typically an IP
//! address). A key that exceeds its threshold inside one window is banned for
//! the lifetime of the process. State is in-memory only and never evicted.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::warn;

/// Length of one counting window
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(5 * 60);
/// Maximum registration attempts per window
pub const MAX_REGISTRATION_ATTEMPTS: u32 = 3;
/// Maximum login attempts per window
pub const MAX_LOGIN_ATTEMPTS: u32 = 10;

/// The kind of attempt being rate limited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitAction {
    Register,
    Login,
}

impl RateLimitAction {
    /// Threshold for this action within one window
    pub fn max_attempts(&self) -> u32 {
        match self {
            Self::Register => MAX_REGISTRATION_ATTEMPTS,
            Self::Login => MAX_LOGIN_ATTEMPTS,
        }
    }
}

impl std::fmt::Display for RateLimitAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Register => write!(f, "register"),
            Self::Login => write!(f, "login"),
        }
    }
}

#[derive(Debug)]
struct AttemptWindow {
    attempts: u32,
    window_start: Instant,
}

#[derive(Debug, Default)]
struct LimiterState {
    attempts: HashMap<String, AttemptWindow>,
    banned: HashSet<String>,
}

/// Per-key fixed-window rate limiter
///
/// Neither the attempt table nor the ban set is ever pruned; both live for
/// the lifetime of the process and are lost on restart.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    /// Create a limiter with the standard 5-minute window
    pub fn new() -> Self {
        Self::with_window(RATE_LIMIT_WINDOW)
    }

    /// Create a limiter with a custom window length
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            state: Mutex::new(LimiterState::default()),
        }
    }

    /// Decide whether a new attempt from `key` is permitted
    ///
    /// Banned keys always fail. Otherwise the attempt counter for `key` is
    /// incremented (after restarting the window if it has expired) and the
    /// key is banned once the counter exceeds the action's threshold.
    pub fn check(&self, key: &str, action: RateLimitAction) -> bool {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let LimiterState { attempts, banned } = &mut *guard;

        if banned.contains(key) {
            return false;
        }

        let now = Instant::now();
        let entry = attempts.entry(key.to_string()).or_insert(AttemptWindow {
            attempts: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) > self.window {
            entry.attempts = 0;
            entry.window_start = now;
        }

        entry.attempts += 1;

        if entry.attempts > action.max_attempts() {
            warn!(key, %action, "Attempt threshold exceeded, banning key");
            banned.insert(key.to_string());
            return false;
        }

        true
    }

    /// Check whether a key has been banned
    pub fn is_banned(&self, key: &str) -> bool {
        let guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        guard.banned.contains(key)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
