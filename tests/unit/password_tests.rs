// ==========================
// tests/unit/password_tests.rs
// ==========================
//! Properties of the password hasher
use rand::{distr::Alphanumeric, Rng};
use rentauth_lib::auth::{work_factor, PasswordHasher};
use rentauth_lib::config::HashingSettings;
use rentauth_lib::error::AuthError;

fn hasher() -> PasswordHasher {
    PasswordHasher::new(&HashingSettings {
        work_factor: 4,
        ..HashingSettings::default()
    })
}

fn random_password(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[test]
fn test_random_passwords_verify_against_their_own_hash() {
    let hasher = hasher();
    for _ in 0..8 {
        let len = rand::rng().random_range(8..=72);
        let password = random_password(len);
        let digest = hasher.hash(password.as_str()).unwrap();
        assert!(hasher.verify(password.as_str(), digest.as_str()).unwrap());
    }
}

#[test]
fn test_distinct_passwords_do_not_cross_verify() {
    let hasher = hasher();
    let first = hasher.hash("FirstPassword1!").unwrap();
    let second = hasher.hash("SecondPassword1!").unwrap();
    assert_ne!(first, second);
    assert!(!hasher.verify("FirstPassword1!", second.as_str()).unwrap());
    assert!(!hasher.verify("SecondPassword1!", first.as_str()).unwrap());
}

#[test]
fn test_boundary_lengths() {
    let hasher = hasher();
    assert!(hasher.hash("Pass123!").is_ok());
    assert!(hasher.hash("A".repeat(72).as_str()).is_ok());

    for bad in [Some(""), None, Some("A".repeat(73).as_str())] {
        assert!(matches!(hasher.hash(bad), Err(AuthError::Validation(_))));
    }
}

#[test]
fn test_default_work_factor_is_embedded() {
    let hasher = PasswordHasher::default();
    assert_eq!(hasher.current_work_factor(), 12);
    let digest = hasher.hash("Secret123!").unwrap();
    assert!(digest.starts_with("$2b$12$"));
    assert_eq!(work_factor(&digest).unwrap(), 12);
}

#[test]
fn test_verify_malformed_digest_is_generic() {
    let hasher = hasher();
    let err = hasher.verify("Secret123!", "$2b$xx$garbage").unwrap_err();
    assert!(matches!(err, AuthError::Verification));
    assert_eq!(err.sanitized_message(), "Password verification failed");
}

#[test]
fn test_overlong_input_does_not_verify_against_its_prefix() {
    let hasher = hasher();
    let password = random_password(72);
    let digest = hasher.hash(password.as_str()).unwrap();

    let longer = format!("{password}x");
    assert!(!matches!(
        hasher.verify(longer.as_str(), digest.as_str()),
        Ok(true)
    ));
}
