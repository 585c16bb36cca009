// ================
// common/src/lib.rs
// ================
//! Common types shared between the authentication core, its user stores and
//! the command line front end.
//!
//! These are owned by this workspace. Nothing here extends a third-party
//! session type; consumers import [`Identity`] and [`Session`] directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse privilege tier used by the role predicates
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Default role for newly registered accounts
    #[default]
    Tenant,
    /// Property owner or manager
    Landlord,
    /// Operator with full access
    Admin,
}

impl Role {
    /// Canonical upper-case name, as stored and serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tenant => "TENANT",
            Role::Landlord => "LANDLORD",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`Role`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TENANT" => Ok(Role::Tenant),
            "LANDLORD" => Ok(Role::Landlord),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// The authenticated principal's public record.
///
/// Carries no secret material and is safe to hand to any caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub email_verified: Option<DateTime<Utc>>,
    pub image: Option<String>,
    /// Set by account moderation, only consulted when suspension blocking is on
    #[serde(default)]
    pub suspended: bool,
}

impl Identity {
    /// Create an identity with no optional profile fields
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: None,
            role,
            email_verified: None,
            image: None,
            suspended: false,
        }
    }
}

/// Session handed out after a successful login
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// `None` models a session object whose principal was never attached
    #[serde(alias = "user")]
    pub identity: Option<Identity>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Has a principal and has not yet expired
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.identity.is_some() && !self.is_expired(now)
    }
}

/// Outcome of a password strength check
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Persisted bcrypt digest.
///
/// `Debug` is redacted so the digest never reaches a log line by accident.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct StoredSecret(String);

impl StoredSecret {
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Raw digest, for the hashing subsystem only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StoredSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StoredSecret(<redacted>)")
    }
}

/// What a user store hands back on lookup
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub identity: Identity,
    /// `None` for accounts created through a federated-only path
    #[serde(default)]
    pub stored_secret: Option<StoredSecret>,
}
