// ============================
// rentauth-lib/src/lib.rs
// ============================
//! Credential authentication and role authorization core for the rental
//! management backend.
//!
//! The pieces, leaf to root: [`auth::PasswordHasher`], [`auth::PasswordPolicy`],
//! [`auth::RehashAdvisor`], [`auth::CredentialAuthenticator`] and the role
//! predicates in [`auth::roles`]. User records come from a [`storage::UserStore`].

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod storage;

pub use rentauth_common as common;

use crate::auth::{issue_session, Authenticator, CredentialAuthenticator};
use crate::config::Settings;
use crate::error::AuthError;
use crate::storage::{FlatFileUserStore, UserStore};
use chrono::Utc;
use rentauth_common::Session;
use std::sync::Arc;

/// Authentication state shared across request handlers
pub struct AuthState<S> {
    /// Credential authenticator
    pub auth: Arc<CredentialAuthenticator<S>>,
    /// Settings the authenticator was built from
    pub settings: Arc<Settings>,
}

impl<S> Clone for AuthState<S> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S: UserStore> AuthState<S> {
    /// Create a new state around `store`
    pub fn new(store: S, settings: Settings) -> Result<Self, AuthError> {
        settings.validate()?;
        let auth = Arc::new(CredentialAuthenticator::new(store, &settings));
        Ok(Self {
            auth,
            settings: Arc::new(settings),
        })
    }

    /// Authenticate and, on success, hand out a fresh session
    pub async fn login(&self, email: &str, password: &str) -> Option<Session> {
        let identity = self.auth.authenticate(email, password).await?;
        Some(issue_session(&identity, Utc::now(), self.settings.session.ttl()))
    }
}

impl AuthState<FlatFileUserStore> {
    /// State backed by the flat-file store under `settings.storage.path`
    pub fn with_flat_file(settings: Settings) -> Result<Self, AuthError> {
        let store = FlatFileUserStore::new(&settings.storage.path)?;
        Self::new(store, settings)
    }
}
