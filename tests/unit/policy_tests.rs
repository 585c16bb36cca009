// ==========================
// tests/unit/policy_tests.rs
// ==========================
//! Password strength rules
use rentauth_lib::auth::{validate_strength, PasswordPolicy, SPECIAL_CHARACTERS};
use rentauth_lib::config::HashingSettings;

#[test]
fn test_weak_password_has_four_errors() {
    let result = validate_strength("weak");
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 4);
    assert!(!result.errors.iter().any(|e| e.contains("lowercase")));
}

#[test]
fn test_strong_password_is_valid() {
    let result = validate_strength("StrongP@ssw0rd123!");
    assert!(result.is_valid);
    assert!(result.errors.is_empty());
}

#[test]
fn test_every_special_character_counts() {
    for c in SPECIAL_CHARACTERS.chars() {
        let password = format!("Abcdefg1{c}");
        assert!(validate_strength(&password).is_valid, "{c} should count as special");
    }
}

#[test]
fn test_empty_password_breaks_every_rule_but_max_length() {
    let result = validate_strength("");
    assert_eq!(result.errors.len(), 5);
}

#[test]
fn test_policy_follows_hashing_settings() {
    let policy = PasswordPolicy::from(&HashingSettings {
        work_factor: 4,
        min_password_length: 10,
        max_password_length: 20,
    });
    let result = policy.validate("Sh0rt!pw");
    assert_eq!(
        result.errors,
        vec!["Password must be at least 10 characters long".to_string()]
    );
}
