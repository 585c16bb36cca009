// ============================
// rentauth-lib/src/auth/session.rs
// ============================
//! Session issuance.
//!
//! A pure mapping from an authenticated identity to a session value. The
//! cookie or token layer that carries it is somebody else's job.
use chrono::{DateTime, Utc};
use rentauth_common::{Identity, Session};
use std::time::Duration;

/// Session TTL (time to live)
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 30); // 30 days

/// Build a new session for `identity`, leaving the input untouched
pub fn issue_session(identity: &Identity, now: DateTime<Utc>, ttl: Duration) -> Session {
    let expires_at = chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    Session {
        identity: Some(identity.clone()),
        expires_at,
    }
}
