// ============================
// rentauth-lib/src/auth/policy.rs
// ============================
//! Password strength rules.
use crate::config::HashingSettings;
use rentauth_common::ValidationResult;

/// Characters that satisfy the special-character rule
pub const SPECIAL_CHARACTERS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

/// Password complexity requirements.
///
/// Every rule is checked; a failing password gets one message per broken rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::from(&HashingSettings::default())
    }
}

impl From<&HashingSettings> for PasswordPolicy {
    fn from(settings: &HashingSettings) -> Self {
        Self {
            min_length: settings.min_password_length,
            max_length: settings.max_password_length,
        }
    }
}

impl PasswordPolicy {
    pub fn validate(&self, password: &str) -> ValidationResult {
        let mut errors = Vec::new();

        if password.len() < self.min_length {
            errors.push(format!(
                "Password must be at least {} characters long",
                self.min_length
            ));
        }
        if password.len() > self.max_length {
            errors.push(format!(
                "Password must be at most {} characters long",
                self.max_length
            ));
        }
        if !password.chars().any(char::is_uppercase) {
            errors.push("Password must contain at least one uppercase letter".to_string());
        }
        if !password.chars().any(char::is_lowercase) {
            errors.push("Password must contain at least one lowercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push("Password must contain at least one number".to_string());
        }
        if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            errors.push("Password must contain at least one special character".to_string());
        }

        ValidationResult::from_errors(errors)
    }
}

/// Check a password against the default policy (8..=72 bytes)
pub fn validate_strength(password: &str) -> ValidationResult {
    PasswordPolicy::default().validate(password)
}
