// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! The `Authenticator` trait and the types that cross it.
use crate::error::AuthError;
use async_trait::async_trait;
use rentauth_common::{Identity, Role};
use std::fmt;

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Run one login attempt. `None` covers every kind of failure.
    async fn authenticate(&self, email: &str, password: &str) -> Option<Identity>;

    /// Same as [`Authenticator::authenticate`], but failure is the generic
    /// [`AuthError::AuthenticationFailed`] instead of `None`.
    async fn authenticate_detailed(&self, email: &str, password: &str)
        -> Result<Identity, AuthError>;

    /// Create an account with a hashed password
    async fn register(&self, new_user: NewUser) -> Result<Identity, AuthError>;
}

/// Registration request
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub role: Role,
}

impl NewUser {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: None,
            role: Role::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish()
    }
}

/// Why a login was rejected. Operator logs only; callers never see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    InvalidInput,
    Throttled,
    StoreUnavailable,
    UnknownUser,
    NoSecret,
    WrongSecret,
    Ineligible,
}

impl LoginFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginFailure::InvalidInput => "invalid_input",
            LoginFailure::Throttled => "throttled",
            LoginFailure::StoreUnavailable => "store_unavailable",
            LoginFailure::UnknownUser => "unknown_user",
            LoginFailure::NoSecret => "no_secret",
            LoginFailure::WrongSecret => "wrong_secret",
            LoginFailure::Ineligible => "ineligible",
        }
    }

    /// Whether this failure counts towards an account lockout
    pub fn counts_against_account(&self) -> bool {
        matches!(
            self,
            LoginFailure::UnknownUser
                | LoginFailure::NoSecret
                | LoginFailure::WrongSecret
                | LoginFailure::Ineligible
        )
    }
}

impl fmt::Display for LoginFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim and case-fold an email for lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
