// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys.
//!
//! Counters are emitted through the `metrics` facade and cost nothing until
//! the host process installs a recorder.
pub const LOGIN_SUCCEEDED: &str = "auth.login.succeeded";
pub const LOGIN_FAILED: &str = "auth.login.failed";
pub const LOGIN_THROTTLED: &str = "auth.login.throttled";
pub const REHASH_SUCCEEDED: &str = "auth.rehash.succeeded";
pub const REHASH_FAILED: &str = "auth.rehash.failed";
pub const REGISTER_SUCCEEDED: &str = "auth.register.succeeded";
