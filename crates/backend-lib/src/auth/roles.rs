// ============================
// rentauth-lib/src/auth/roles.rs
// ============================
//! Role predicates over an identity or session.
//!
//! These never fail: a missing identity is simply not authorized. Access
//! rules are built by the caller, e.g. `is_authenticated(s) && is_admin(id)`.
use rentauth_common::{Identity, Role, Session};

/// Identity is present and carries exactly `role`
pub fn has_role(identity: Option<&Identity>, role: Role) -> bool {
    identity.is_some_and(|id| id.role == role)
}

pub fn is_admin(identity: Option<&Identity>) -> bool {
    has_role(identity, Role::Admin)
}

pub fn is_landlord_or_admin(identity: Option<&Identity>) -> bool {
    identity.is_some_and(|id| matches!(id.role, Role::Landlord | Role::Admin))
}

/// Narrow a session to its principal. `None` for a missing session or a
/// session with no identity attached.
pub fn authenticated_identity(session: Option<&Session>) -> Option<&Identity> {
    session.and_then(|s| s.identity.as_ref())
}

pub fn is_authenticated(session: Option<&Session>) -> bool {
    authenticated_identity(session).is_some()
}
