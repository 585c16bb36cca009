// ============================
// rentauth-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Digests are bcrypt strings of the form `$2b$<cost>$<salt><hash>`. The cost
//! embedded in a digest is what [`work_factor`] reads back and what the rehash
//! advisor compares against the configured cost.
use crate::config::{HashingSettings, BCRYPT_MAX_INPUT};
use crate::error::AuthError;
use bcrypt::HashParts;
use std::str::FromStr;
use std::sync::OnceLock;
use zeroize::Zeroize;

/// Default bcrypt cost
pub const DEFAULT_WORK_FACTOR: u32 = 12;

/// Input fed to the decoy digest used by [`PasswordHasher::dummy_verify`]
const DUMMY_PLAINTEXT: &str = "rentauth-decoy-credential";

/// Salted, cost-parameterised password hasher.
///
/// Cheap to share behind an `Arc`; it holds no mutable state apart from the
/// decoy digest, computed once by [`PasswordHasher::prepare_decoy`] or on first use.
#[derive(Debug)]
pub struct PasswordHasher {
    work_factor: u32,
    min_length: usize,
    max_length: usize,
    decoy: OnceLock<String>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(&HashingSettings::default())
    }
}

impl PasswordHasher {
    pub fn new(settings: &HashingSettings) -> Self {
        Self {
            work_factor: settings.work_factor,
            min_length: settings.min_password_length,
            max_length: settings.max_password_length.min(BCRYPT_MAX_INPUT),
            decoy: OnceLock::new(),
        }
    }

    /// Cost used for every new digest
    pub fn current_work_factor(&self) -> u32 {
        self.work_factor
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// `None` stands for a missing password. Length is counted in bytes since
    /// that is the unit bcrypt truncates on.
    pub fn hash<'a>(&self, plaintext: impl Into<Option<&'a str>>) -> Result<String, AuthError> {
        let plain = plaintext
            .into()
            .ok_or_else(|| AuthError::Validation("Password is required".to_string()))?;

        if plain.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }
        if plain.len() < self.min_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        if plain.len() > self.max_length {
            return Err(AuthError::Validation(format!(
                "Password must be at most {} characters long",
                self.max_length
            )));
        }

        bcrypt::hash(plain, self.work_factor).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Hash a password and wipe the caller's buffer afterwards, whatever the outcome
    pub fn hash_secure(&self, plain: &mut String) -> Result<String, AuthError> {
        let result = self.hash(plain.as_str());
        plain.zeroize();
        result
    }

    /// Check a plaintext against a stored digest.
    ///
    /// Every failure collapses into [`AuthError::Verification`], so callers
    /// cannot tell a malformed digest from bad input.
    pub fn verify<'a, 'b>(
        &self,
        plaintext: impl Into<Option<&'a str>>,
        digest: impl Into<Option<&'b str>>,
    ) -> Result<bool, AuthError> {
        let (Some(plain), Some(digest)) = (plaintext.into(), digest.into()) else {
            return Err(AuthError::Verification);
        };
        if plain.is_empty() || digest.is_empty() {
            return Err(AuthError::Verification);
        }
        if plain.len() > BCRYPT_MAX_INPUT {
            // bcrypt would compare only the first 72 bytes; spend the same time, then refuse
            let _ = bcrypt::verify(&plain.as_bytes()[..BCRYPT_MAX_INPUT], digest);
            return Err(AuthError::Verification);
        }

        bcrypt::verify(plain, digest).map_err(|_| AuthError::Verification)
    }

    /// Compute the decoy digest now instead of on the first unknown-user login
    pub fn prepare_decoy(&self) {
        self.decoy();
    }

    pub fn decoy_ready(&self) -> bool {
        self.decoy.get().is_some()
    }

    fn decoy(&self) -> &str {
        self.decoy
            .get_or_init(|| bcrypt::hash(DUMMY_PLAINTEXT, self.work_factor).unwrap_or_default())
    }

    /// Burn roughly one verification's worth of time against a decoy digest.
    ///
    /// Used on login paths that never reach a real comparison.
    pub fn dummy_verify(&self, plaintext: &str) {
        let decoy = self.decoy();
        if !decoy.is_empty() {
            let _ = bcrypt::verify(plaintext, decoy);
        }
    }
}

/// Read the cost parameter embedded in a digest
pub fn work_factor(digest: &str) -> Result<u32, AuthError> {
    HashParts::from_str(digest)
        .map(|parts| parts.get_cost())
        .map_err(|_| AuthError::Validation("Malformed password digest".to_string()))
}
