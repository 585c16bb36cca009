// crates/backend-lib/src/error.rs

//! Central error type for the authentication core.
use thiserror::Error;

/// Error taxonomy.
///
/// `Validation` describes the caller's own input and may carry detail.
/// `Verification` and `AuthenticationFailed` are match outcomes and carry none.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Password verification failed")]
    Verification,

    #[error("Invalid email or password")]
    AuthenticationFailed,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuthError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VAL_001",
            AuthError::Hashing(_) => "HASH_001",
            AuthError::Verification => "AUTH_002",
            AuthError::AuthenticationFailed => "AUTH_001",
            AuthError::Conflict(_) => "CONFLICT_001",
            AuthError::Storage(_) => "STORE_001",
            AuthError::Config(_) => "CFG_001",
            AuthError::Io(_) => "IO_001",
            AuthError::Json(_) => "JSON_001",
        }
    }

    /// Whether the full `Display` text may cross a trust boundary
    pub fn is_client_safe(&self) -> bool {
        matches!(
            self,
            AuthError::Validation(_)
                | AuthError::Verification
                | AuthError::AuthenticationFailed
                | AuthError::Conflict(_)
        )
    }

    /// Get a sanitized message suitable for untrusted callers
    pub fn sanitized_message(&self) -> String {
        match self {
            AuthError::Validation(msg) => msg.clone(),
            AuthError::Verification => "Password verification failed".to_string(),
            AuthError::AuthenticationFailed => "Invalid email or password".to_string(),
            AuthError::Conflict(_) => "Account already exists".to_string(),
            AuthError::Hashing(_) => "An internal error occurred".to_string(),
            AuthError::Storage(_) | AuthError::Io(_) | AuthError::Json(_) => {
                "Internal server error".to_string()
            },
            AuthError::Config(_) => "Service misconfigured".to_string(),
        }
    }
}

impl From<figment::Error> for AuthError {
    fn from(err: figment::Error) -> Self {
        AuthError::Config(err.to_string())
    }
}
