// =============
// crates/backend-lib/src/auth/service_impl.rs
// =============
//! Credential authenticator backed by a [`UserStore`].
//!
//! One login attempt runs these steps in order and stops at the first failure:
//!
//! 1. validate input (email and password present)
//! 2. throttle check on the normalized email
//! 3. look the user up
//! 4. make sure the account has a password at all
//! 5. verify the password
//! 6. eligibility check (only what [`EligibilitySettings`] switches on)
//! 7. rehash the stored digest if its cost is below the configured one
//!
//! Every failure reaches the caller as the same `None` /
//! [`AuthError::AuthenticationFailed`]. Step 7 never fails the login.
use super::password::PasswordHasher;
use super::policy::PasswordPolicy;
use super::rate_limit::AuthRateLimiter;
use super::rehash::RehashAdvisor;
use super::service::{normalize_email, Authenticator, LoginFailure, NewUser};
use crate::config::{EligibilitySettings, Settings};
use crate::error::AuthError;
use crate::metrics as keys;
use crate::storage::UserStore;
use async_trait::async_trait;
use metrics::counter;
use regex::Regex;
use rentauth_common::{Identity, StoredSecret, UserRecord};
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

/// Run CPU-heavy bcrypt work off the async worker threads
async fn run_blocking<T, F>(task: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AuthError::Hashing(format!("hashing task did not complete: {e}")))?
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    if email.is_empty() {
        return Err(AuthError::Validation("Email address is required".to_string()));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(AuthError::Validation(format!(
            "Email address cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(AuthError::Validation(
            "Invalid email address format".to_string(),
        ));
    }
    Ok(())
}

pub struct CredentialAuthenticator<S> {
    store: S,
    hasher: Arc<PasswordHasher>,
    advisor: RehashAdvisor,
    policy: PasswordPolicy,
    throttle: AuthRateLimiter,
    eligibility: EligibilitySettings,
}

impl<S: UserStore> CredentialAuthenticator<S> {
    pub fn new(store: S, settings: &Settings) -> Self {
        let hasher = PasswordHasher::new(&settings.hashing);
        hasher.prepare_decoy();
        Self {
            store,
            advisor: RehashAdvisor::new(hasher.current_work_factor()),
            hasher: Arc::new(hasher),
            policy: PasswordPolicy::from(&settings.hashing),
            throttle: AuthRateLimiter::from(&settings.throttle),
            eligibility: settings.eligibility.clone(),
        }
    }

    /// Share a limiter with other authenticators, or swap in a custom one
    pub fn with_throttle(mut self, throttle: AuthRateLimiter) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn throttle(&self) -> &AuthRateLimiter {
        &self.throttle
    }

    #[instrument(name = "login_attempt", skip_all)]
    async fn attempt(&self, email: &str, password: &str) -> Result<Identity, LoginFailure> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(LoginFailure::InvalidInput);
        }

        if !self.throttle.check_rate_limit(&email) {
            return Err(LoginFailure::Throttled);
        }

        let outcome = self.check_credentials(&email, password).await;
        match &outcome {
            Ok(_) => self.throttle.record_success(&email),
            Err(failure) if failure.counts_against_account() => {
                self.throttle.record_failed_attempt(&email)
            },
            Err(_) => {},
        }

        match &outcome {
            Ok(identity) => info!(user_id = %identity.id, "login succeeded"),
            Err(failure) => debug!(email = %email, reason = %failure, "login rejected"),
        }
        outcome
    }

    async fn check_credentials(&self, email: &str, password: &str) -> Result<Identity, LoginFailure> {
        let record = match self.store.find_by_email(email).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.burn_verification(password).await;
                return Err(LoginFailure::UnknownUser);
            },
            Err(e) => {
                warn!(error = %e, "user store lookup failed");
                return Err(LoginFailure::StoreUnavailable);
            },
        };

        let UserRecord {
            identity,
            stored_secret,
        } = record;
        let Some(secret) = stored_secret else {
            self.burn_verification(password).await;
            return Err(LoginFailure::NoSecret);
        };

        let digest = secret.expose().to_string();
        if !self.verify(password, digest.clone()).await {
            return Err(LoginFailure::WrongSecret);
        }

        self.check_eligibility(&identity)?;

        if self.advisor.should_rehash(&digest) {
            self.rehash(&identity.id, password).await;
        }

        Ok(identity)
    }

    async fn verify(&self, password: &str, digest: String) -> bool {
        let hasher = Arc::clone(&self.hasher);
        let plain = Zeroizing::new(password.to_owned());
        run_blocking(move || hasher.verify(plain.as_str(), digest.as_str()))
            .await
            .unwrap_or(false)
    }

    /// Keep "no such account" about as slow as "wrong password"
    async fn burn_verification(&self, password: &str) {
        let hasher = Arc::clone(&self.hasher);
        let plain = Zeroizing::new(password.to_owned());
        let _ = run_blocking(move || {
            hasher.dummy_verify(plain.as_str());
            Ok(())
        })
        .await;
    }

    fn check_eligibility(&self, identity: &Identity) -> Result<(), LoginFailure> {
        if self.eligibility.require_verified_email && identity.email_verified.is_none() {
            debug!(user_id = %identity.id, "email not verified");
            return Err(LoginFailure::Ineligible);
        }
        if self.eligibility.block_suspended && identity.suspended {
            debug!(user_id = %identity.id, "account suspended");
            return Err(LoginFailure::Ineligible);
        }
        Ok(())
    }

    /// Best effort: any failure here is logged and dropped
    async fn rehash(&self, identity_id: &str, password: &str) {
        let hasher = Arc::clone(&self.hasher);
        let mut plain = Zeroizing::new(password.to_owned());
        let digest = match run_blocking(move || hasher.hash_secure(&mut plain)).await {
            Ok(digest) => digest,
            Err(e) => {
                warn!(user_id = %identity_id, error = %e, "could not compute upgraded digest");
                counter!(keys::REHASH_FAILED).increment(1);
                return;
            },
        };

        match self.store.update_secret(identity_id, &digest).await {
            Ok(()) => {
                info!(
                    user_id = %identity_id,
                    work_factor = self.hasher.current_work_factor(),
                    "stored digest upgraded"
                );
                counter!(keys::REHASH_SUCCEEDED).increment(1);
            },
            Err(e) => {
                warn!(user_id = %identity_id, error = %e, "could not persist upgraded digest");
                counter!(keys::REHASH_FAILED).increment(1);
            },
        }
    }
}

#[async_trait]
impl<S: UserStore> Authenticator for CredentialAuthenticator<S> {
    async fn authenticate(&self, email: &str, password: &str) -> Option<Identity> {
        self.authenticate_detailed(email, password).await.ok()
    }

    async fn authenticate_detailed(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        match self.attempt(email, password).await {
            Ok(identity) => {
                counter!(keys::LOGIN_SUCCEEDED).increment(1);
                Ok(identity)
            },
            Err(failure) => {
                if failure == LoginFailure::Throttled {
                    counter!(keys::LOGIN_THROTTLED).increment(1);
                } else {
                    counter!(keys::LOGIN_FAILED).increment(1);
                }
                Err(AuthError::AuthenticationFailed)
            },
        }
    }

    async fn register(&self, new_user: NewUser) -> Result<Identity, AuthError> {
        let NewUser {
            email,
            password,
            name,
            role,
        } = new_user;
        let mut password = Zeroizing::new(password);
        let email = normalize_email(&email);
        validate_email(&email)?;

        let report = self.policy.validate(&password);
        if !report.is_valid {
            return Err(AuthError::Validation(report.errors.join("; ")));
        }

        let hasher = Arc::clone(&self.hasher);
        let digest = run_blocking(move || hasher.hash_secure(&mut password)).await?;

        let mut identity = Identity::new(Uuid::new_v4().to_string(), email, role);
        identity.name = name.filter(|n| !n.trim().is_empty());

        self.store
            .create_user(UserRecord {
                identity: identity.clone(),
                stored_secret: Some(StoredSecret::new(digest)),
            })
            .await?;

        info!(user_id = %identity.id, role = %identity.role, "user registered");
        counter!(keys::REGISTER_SUCCEEDED).increment(1);
        Ok(identity)
    }
}
