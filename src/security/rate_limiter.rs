//! Sliding-window rate limiting for authentication actions
//!
//! Attempt timestamps are kept per action in a durable key-value store
//! under `rateLimit_<action>` as a JSON array of epoch milliseconds.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::persistence::KeyValueStore;

pub const DEFAULT_MAX_ATTEMPTS: usize = 5;
pub const DEFAULT_WINDOW_MS: i64 = 300_000;

const KEY_PREFIX: &str = "rateLimit_";

/// Source of the current time in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually advanced clock for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        ManualClock {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Limits how often an action may be attempted within a sliding window
pub struct RateLimiter {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    /// Default max attempts for `check`
    max_attempts: usize,
    /// Default window width for `check`
    window_ms: i64,
    /// Serializes read-prune-append-write sequences
    guard: Mutex<()>,
}

impl RateLimiter {
    /// Create a limiter with default thresholds and the wall clock
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW_MS)
    }

    /// Create with custom default thresholds
    pub fn with_config(store: Arc<dyn KeyValueStore>, max_attempts: usize, window_ms: i64) -> Self {
        RateLimiter {
            store,
            clock: Arc::new(SystemClock),
            max_attempts,
            window_ms,
            guard: Mutex::new(()),
        }
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Check `action` against the configured defaults
    pub fn check(&self, action: &str) -> bool {
        self.check_rate_limit(action, self.max_attempts, self.window_ms)
    }

    /// Record an attempt for `action` unless the limit is reached
    ///
    /// Returns `false` when `max_attempts` attempts already fall inside the
    /// window; a denied check leaves the stored history untouched.
    pub fn check_rate_limit(&self, action: &str, max_attempts: usize, window_ms: i64) -> bool {
        let _serialized = self.serialize();

        let key = storage_key(action);
        let now = self.clock.now_millis();

        let mut attempts = self.load_attempts(&key);
        attempts.retain(|&t| is_recent(now, t, window_ms));

        if attempts.len() >= max_attempts {
            log::debug!(
                "Rate limit reached for '{}': {} attempts in the last {} ms (max {})",
                action,
                attempts.len(),
                window_ms,
                max_attempts
            );
            return false;
        }

        attempts.push(now);
        match serde_json::to_string(&attempts) {
            Ok(encoded) => {
                if let Err(e) = self.store.set(&key, &encoded) {
                    log::warn!("Failed to persist rate limit attempts for '{}': {}", action, e);
                }
            }
            Err(e) => log::warn!("Failed to encode rate limit attempts for '{}': {}", action, e),
        }

        true
    }

    /// Number of attempts for `action` currently inside the default window
    pub fn attempt_count(&self, action: &str) -> usize {
        let _serialized = self.serialize();
        let now = self.clock.now_millis();
        self.load_attempts(&storage_key(action))
            .into_iter()
            .filter(|&t| is_recent(now, t, self.window_ms))
            .count()
    }

    /// Forget every attempt recorded for `action`
    pub fn reset(&self, action: &str) {
        if let Err(e) = self.store.remove(&storage_key(action)) {
            log::warn!("Failed to reset rate limit for '{}': {}", action, e);
        }
    }

    fn serialize(&self) -> MutexGuard<'_, ()> {
        match self.guard.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Stored history, or an empty one when absent or unreadable
    fn load_attempts(&self, key: &str) -> Vec<i64> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("Failed to read rate limit history '{}': {}", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<i64>>(&raw) {
            Ok(attempts) => attempts,
            Err(e) => {
                log::warn!("Discarding corrupt rate limit history '{}': {}", key, e);
                Vec::new()
            }
        }
    }
}

/// Out-of-range timestamps saturate instead of overflowing
fn is_recent(now: i64, timestamp: i64, window_ms: i64) -> bool {
    now.saturating_sub(timestamp) < window_ms
}

fn storage_key(action: &str) -> String {
    format!("{}{}", KEY_PREFIX, action)
}
