// ===================================
// tests/integration/auth_flow_tests.rs
// ===================================
//! End-to-end login flows against the in-memory store
use crate::test_utils::{fast_settings, FailingSecretStore, UnavailableStore};
use rentauth_common::{Identity, Role, StoredSecret, UserRecord};
use rentauth_lib::{
    auth::{work_factor, AuthRateLimiter, Authenticator, CredentialAuthenticator, NewUser},
    config::Settings,
    error::AuthError,
    storage::{InMemoryUserStore, UserStore},
    AuthState,
};
use std::time::Duration;

#[tokio::test]
async fn test_register_then_login_at_default_cost() {
    let auth = CredentialAuthenticator::new(InMemoryUserStore::new(), &Settings::default());

    let identity = auth
        .register(NewUser::new("tenant@example.com", "Secret123!"))
        .await
        .unwrap();
    assert_eq!(identity.role, Role::Tenant);

    let record = auth
        .store()
        .find_by_email("tenant@example.com")
        .await
        .unwrap()
        .unwrap();
    let digest = record.stored_secret.unwrap();
    assert_eq!(work_factor(digest.expose()).unwrap(), 12);

    let logged_in = auth
        .authenticate("tenant@example.com", "Secret123!")
        .await
        .unwrap();
    assert_eq!(logged_in.id, identity.id);

    let err = auth
        .authenticate_detailed("tenant@example.com", "WrongPass1!")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AuthenticationFailed));
}

#[tokio::test]
async fn test_failed_rehash_does_not_fail_login() {
    let store = FailingSecretStore::default();
    let digest = bcrypt::hash("Secret123!", 10).unwrap();
    store
        .inner
        .create_user(UserRecord {
            identity: Identity::new("user-1", "old@example.com", Role::Landlord),
            stored_secret: Some(StoredSecret::new(digest)),
        })
        .await
        .unwrap();

    let auth = CredentialAuthenticator::new(store, &Settings::default());
    let identity = auth.authenticate("old@example.com", "Secret123!").await;

    assert_eq!(identity.map(|i| i.role), Some(Role::Landlord));
    assert_eq!(auth.store().update_calls(), 1);
    let offered = auth.store().offered_digests();
    assert_eq!(offered.len(), 1);
    assert_eq!(work_factor(&offered[0]).unwrap(), 12);

    let record = auth
        .store()
        .inner
        .find_by_email("old@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(work_factor(record.stored_secret.unwrap().expose()).unwrap(), 10);
}

#[tokio::test]
async fn test_store_outage_is_a_plain_failure() {
    let auth = CredentialAuthenticator::new(UnavailableStore, &fast_settings());
    assert!(auth.authenticate("a@example.com", "Secret123!").await.is_none());

    let err = auth
        .authenticate_detailed("a@example.com", "Secret123!")
        .await
        .unwrap_err();
    assert_eq!(err.sanitized_message(), "Invalid email or password");
}

#[tokio::test]
async fn test_unknown_and_wrong_password_look_the_same() {
    let auth = CredentialAuthenticator::new(InMemoryUserStore::new(), &fast_settings());
    auth.register(NewUser::new("known@example.com", "Secret123!"))
        .await
        .unwrap();

    let unknown = auth
        .authenticate_detailed("nobody@example.com", "Secret123!")
        .await
        .unwrap_err();
    let wrong = auth
        .authenticate_detailed("known@example.com", "Wrong123!")
        .await
        .unwrap_err();
    assert_eq!(unknown.to_string(), wrong.to_string());
    assert_eq!(unknown.error_code(), wrong.error_code());
}

#[tokio::test]
async fn test_state_login_issues_session() {
    let state = AuthState::new(InMemoryUserStore::new(), fast_settings()).unwrap();
    state
        .auth
        .register(NewUser::new("admin@example.com", "Secret123!").with_role(Role::Admin))
        .await
        .unwrap();

    let session = state.login("ADMIN@example.com ", "Secret123!").await.unwrap();
    assert!(session.is_active(chrono::Utc::now()));
    assert_eq!(session.identity.map(|i| i.role), Some(Role::Admin));

    assert!(state.login("admin@example.com", "nope").await.is_none());
}

#[tokio::test]
async fn test_concurrent_logins_share_state() {
    let state = AuthState::new(InMemoryUserStore::new(), fast_settings()).unwrap();
    state
        .auth
        .register(NewUser::new("busy@example.com", "Secret123!"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            state.login("busy@example.com", "Secret123!").await.is_some()
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap());
    }
}

#[tokio::test]
async fn test_overlong_password_is_rejected_at_login() {
    let auth = CredentialAuthenticator::new(InMemoryUserStore::new(), &fast_settings());
    let password = format!("Aa1!{}", "x".repeat(68));
    assert_eq!(password.len(), 72);
    auth.register(NewUser::new("long@example.com", password.clone()))
        .await
        .unwrap();

    assert!(auth.authenticate("long@example.com", &password).await.is_some());
    let longer = format!("{password}ANYTHING-ELSE");
    assert!(auth.authenticate("long@example.com", &longer).await.is_none());
}

#[tokio::test]
async fn test_unknown_emails_do_not_grow_throttle_without_bound() {
    let throttle = AuthRateLimiter::new(5, Duration::from_secs(300)).with_capacity(25);
    let auth = CredentialAuthenticator::new(InMemoryUserStore::new(), &fast_settings())
        .with_throttle(throttle.clone());

    for i in 0..100 {
        let email = format!("ghost{i}@example.com");
        assert!(auth.authenticate(&email, "Secret123!").await.is_none());
    }
    assert!(throttle.tracked() <= 25);
    assert!(auth.throttle().tracked() <= 25);
}

#[tokio::test]
async fn test_decoy_ready_before_first_login() {
    let auth = CredentialAuthenticator::new(InMemoryUserStore::new(), &fast_settings());
    assert!(auth.hasher().decoy_ready());
}
