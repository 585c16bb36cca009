// ============================
// rentauth-lib/src/auth/mod.rs
// ============================
//! Authentication and authorization.

pub mod password;
pub mod policy;
pub mod rate_limit;
pub mod rehash;
pub mod roles;
mod service;
mod service_impl;
pub mod session;

pub use password::{work_factor, PasswordHasher, DEFAULT_WORK_FACTOR};
pub use policy::{validate_strength, PasswordPolicy, SPECIAL_CHARACTERS};
pub use rate_limit::AuthRateLimiter;
pub use rehash::RehashAdvisor;
pub use roles::{authenticated_identity, has_role, is_admin, is_authenticated, is_landlord_or_admin};
pub use service::{normalize_email, Authenticator, LoginFailure, NewUser};
pub use service_impl::CredentialAuthenticator;
pub use session::{issue_session, SESSION_TTL};
