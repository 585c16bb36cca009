// ============================
// rentauth-lib/src/auth/rate_limit.rs
// ============================
//! Lockout after repeated failed logins for the same account.

use crate::config::ThrottleSettings;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default number of failed attempts before lockout
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default lockout duration (5 minutes)
const DEFAULT_LOCKOUT_DURATION: Duration = Duration::from_secs(5 * 60);

/// Default bound on the number of accounts tracked at once
const DEFAULT_MAX_TRACKED: usize = 10_000;

#[derive(Debug, Clone)]
struct RateLimitEntry {
    failed_attempts: u32,
    last_failure: Instant,
    lockout_expiry: Option<Instant>,
}

/// Failed-login counter keyed by normalized email
#[derive(Debug, Clone)]
pub struct AuthRateLimiter {
    attempts: Arc<DashMap<String, RateLimitEntry>>,
    /// 0 disables the limiter
    max_attempts: u32,
    lockout_duration: Duration,
    max_tracked: usize,
}

impl Default for AuthRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_LOCKOUT_DURATION)
    }
}

impl From<&ThrottleSettings> for AuthRateLimiter {
    fn from(settings: &ThrottleSettings) -> Self {
        Self::new(settings.max_attempts, settings.lockout()).with_capacity(settings.max_tracked)
    }
}

impl AuthRateLimiter {
    pub fn new(max_attempts: u32, lockout_duration: Duration) -> Self {
        Self {
            attempts: Arc::new(DashMap::new()),
            max_attempts,
            lockout_duration,
            max_tracked: DEFAULT_MAX_TRACKED,
        }
    }

    /// Bound the number of tracked accounts. Past it, new failures first
    /// prune stale counters, then every counter that is not locked out.
    pub fn with_capacity(mut self, max_tracked: usize) -> Self {
        self.max_tracked = max_tracked.max(1);
        self
    }

    /// A limiter that never locks anyone out
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 0
    }

    /// Record a failed authentication attempt
    pub fn record_failed_attempt(&self, key: &str) {
        if !self.is_enabled() {
            return;
        }
        let now = Instant::now();

        if !self.attempts.contains_key(key) && self.attempts.len() >= self.max_tracked {
            self.make_room(now);
        }

        let mut entry = self
            .attempts
            .entry(key.to_string())
            .or_insert_with(|| RateLimitEntry {
                failed_attempts: 0,
                last_failure: now,
                lockout_expiry: None,
            });

        // An expired lockout starts a fresh count
        if entry.lockout_expiry.is_some_and(|expiry| now >= expiry) {
            entry.failed_attempts = 0;
            entry.lockout_expiry = None;
        }

        entry.failed_attempts += 1;
        entry.last_failure = now;

        if entry.failed_attempts >= self.max_attempts && entry.lockout_expiry.is_none() {
            entry.lockout_expiry = Some(now + self.lockout_duration);
            warn!(
                account = %key,
                attempts = entry.failed_attempts,
                "account locked out after repeated failed logins"
            );
        }
    }

    /// Record a successful authentication
    pub fn record_success(&self, key: &str) {
        self.attempts.remove(key);
    }

    /// Check if an account may attempt authentication
    pub fn check_rate_limit(&self, key: &str) -> bool {
        match self.attempts.get(key) {
            Some(entry) => !entry
                .lockout_expiry
                .is_some_and(|expiry| Instant::now() < expiry),
            None => true,
        }
    }

    /// Drop expired lockouts and counters with no failure for a full lockout window
    pub fn cleanup(&self) {
        self.prune_stale(Instant::now());
    }

    fn prune_stale(&self, now: Instant) {
        let window = self.lockout_duration;
        self.attempts.retain(|_, entry| match entry.lockout_expiry {
            Some(expiry) => now < expiry,
            None => now.duration_since(entry.last_failure) < window,
        });
    }

    fn make_room(&self, now: Instant) {
        let before = self.attempts.len();
        self.prune_stale(now);
        if self.attempts.len() >= self.max_tracked {
            self.attempts
                .retain(|_, entry| entry.lockout_expiry.is_some_and(|expiry| now < expiry));
        }
        debug!(
            evicted = before.saturating_sub(self.attempts.len()),
            "throttle map at capacity, pruned"
        );
    }

    /// Number of accounts currently tracked
    pub fn tracked(&self) -> usize {
        self.attempts.len()
    }
}
