// ==========================
// tests/unit/rehash_tests.rs
// ==========================
//! Rehash decisions against the default work factor of 12
use rentauth_lib::auth::{RehashAdvisor, DEFAULT_WORK_FACTOR};

#[test]
fn test_cost_ten_digest_is_stale() {
    let advisor = RehashAdvisor::new(DEFAULT_WORK_FACTOR);
    let digest = bcrypt::hash("Secret123!", 10).unwrap();
    assert!(advisor.should_rehash(&digest));
}

#[test]
fn test_cost_fourteen_digest_is_kept() {
    let advisor = RehashAdvisor::new(DEFAULT_WORK_FACTOR);
    let digest = bcrypt::hash("Secret123!", 14).unwrap();
    assert!(!advisor.should_rehash(&digest));
}

#[test]
fn test_garbage_digest_is_stale() {
    let advisor = RehashAdvisor::new(DEFAULT_WORK_FACTOR);
    assert!(advisor.should_rehash("not-a-real-digest"));
}
