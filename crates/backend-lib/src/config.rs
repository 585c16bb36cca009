// ============================
// rentauth-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are resolved once at startup and passed explicitly into the
//! hasher, authenticator and stores. Nothing reads the environment later.
use crate::error::AuthError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file looked up by [`Settings::load`]
pub const DEFAULT_CONFIG_FILE: &str = "rentauth.toml";

/// Prefix for environment overrides, e.g. `RENTAUTH_HASHING__WORK_FACTOR=13`
pub const ENV_PREFIX: &str = "RENTAUTH_";

/// Lowest cost bcrypt accepts
pub const MIN_WORK_FACTOR: u32 = 4;
/// Highest cost bcrypt accepts
pub const MAX_WORK_FACTOR: u32 = 31;
/// bcrypt only reads the first 72 bytes of its input
pub const BCRYPT_MAX_INPUT: usize = 72;

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub hashing: HashingSettings,
    pub throttle: ThrottleSettings,
    pub eligibility: EligibilitySettings,
    pub session: SessionSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

/// Password hashing cost and accepted plaintext bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingSettings {
    /// bcrypt cost; each step doubles hashing time
    pub work_factor: u32,
    pub min_password_length: usize,
    pub max_password_length: usize,
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            work_factor: 12,
            min_password_length: 8,
            max_password_length: BCRYPT_MAX_INPUT,
        }
    }
}

/// Lockout after repeated failed logins for one email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleSettings {
    /// 0 disables throttling
    pub max_attempts: u32,
    pub lockout_secs: u64,
    /// Accounts tracked at once before stale and unlocked entries are pruned
    pub max_tracked: usize,
}

impl Default for ThrottleSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout_secs: 5 * 60,
            max_tracked: 10_000,
        }
    }
}

impl ThrottleSettings {
    pub fn lockout(&self) -> Duration {
        Duration::from_secs(self.lockout_secs)
    }
}

/// Optional post-verification account checks. Both are off unless configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilitySettings {
    pub require_verified_email: bool,
    pub block_suspended: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub ttl_secs: u64,
}

impl SessionSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 60 * 60 * 24 * 30, // 30 days
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding `users.json`
    pub path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `rentauth_lib=debug`
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Load from `rentauth.toml` (if present) and `RENTAUTH_*` env vars
    pub fn load() -> Result<Self, AuthError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from the given TOML file (if present) and `RENTAUTH_*` env vars
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the hashing backend or the lockout logic cannot honor
    pub fn validate(&self) -> Result<(), AuthError> {
        let hashing = &self.hashing;
        if !(MIN_WORK_FACTOR..=MAX_WORK_FACTOR).contains(&hashing.work_factor) {
            return Err(AuthError::Config(format!(
                "hashing.work_factor must be between {MIN_WORK_FACTOR} and {MAX_WORK_FACTOR}, got {}",
                hashing.work_factor
            )));
        }
        if hashing.min_password_length == 0 {
            return Err(AuthError::Config(
                "hashing.min_password_length must be at least 1".to_string(),
            ));
        }
        if hashing.max_password_length > BCRYPT_MAX_INPUT {
            return Err(AuthError::Config(format!(
                "hashing.max_password_length cannot exceed {BCRYPT_MAX_INPUT}, got {}",
                hashing.max_password_length
            )));
        }
        if hashing.min_password_length > hashing.max_password_length {
            return Err(AuthError::Config(
                "hashing.min_password_length cannot exceed hashing.max_password_length"
                    .to_string(),
            ));
        }
        if self.throttle.max_attempts > 0 && self.throttle.max_tracked == 0 {
            return Err(AuthError::Config(
                "throttle.max_tracked must be positive when throttling is enabled".to_string(),
            ));
        }
        if self.throttle.max_attempts > 0 && self.throttle.lockout_secs == 0 {
            return Err(AuthError::Config(
                "throttle.lockout_secs must be positive when throttling is enabled".to_string(),
            ));
        }
        if self.session.ttl_secs == 0 {
            return Err(AuthError::Config(
                "session.ttl_secs must be positive".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(AuthError::Config("logging.level must not be empty".to_string()));
        }
        Ok(())
    }
}
