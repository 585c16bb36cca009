// ========================================
// tests/integration/flat_file_flow_tests.rs
// ========================================
//! Register and log in through the flat-file store
use crate::test_utils::{fast_settings, setup_test_env};
use rentauth_common::Role;
use rentauth_lib::{
    auth::{authenticated_identity, is_authenticated, is_landlord_or_admin, Authenticator, NewUser},
    error::AuthError,
    storage::{FlatFileUserStore, UserStore, USERS_FILE},
    AuthState,
};

#[tokio::test]
async fn test_login_through_flat_file_store() {
    let (state, _temp_dir) = setup_test_env(fast_settings());
    state
        .auth
        .register(
            NewUser::new("landlord@example.com", "Secret123!")
                .with_name("Lee")
                .with_role(Role::Landlord),
        )
        .await
        .unwrap();

    let session = state.login("landlord@example.com", "Secret123!").await;
    assert!(is_authenticated(session.as_ref()));
    let identity = authenticated_identity(session.as_ref());
    assert!(is_landlord_or_admin(identity));
    assert_eq!(identity.and_then(|i| i.name.as_deref()), Some("Lee"));
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let (state, temp_dir) = setup_test_env(fast_settings());
    state
        .auth
        .register(NewUser::new("tenant@example.com", "Secret123!"))
        .await
        .unwrap();
    assert!(temp_dir.path().join(USERS_FILE).exists());

    let mut settings = fast_settings();
    settings.storage.path = temp_dir.path().to_path_buf();
    let reopened = AuthState::with_flat_file(settings).unwrap();
    assert!(reopened.login("tenant@example.com", "Secret123!").await.is_some());
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let (state, _temp_dir) = setup_test_env(fast_settings());
    state
        .auth
        .register(NewUser::new("dup@example.com", "Secret123!"))
        .await
        .unwrap();

    let err = state
        .auth
        .register(NewUser::new("Dup@Example.com", "Another123!"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));
}

#[tokio::test]
async fn test_stored_file_holds_no_plaintext() {
    let (state, temp_dir) = setup_test_env(fast_settings());
    state
        .auth
        .register(NewUser::new("secret@example.com", "Secret123!"))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(temp_dir.path().join(USERS_FILE)).unwrap();
    assert!(!raw.contains("Secret123!"));

    let store = FlatFileUserStore::new(temp_dir.path()).unwrap();
    let record = store.find_by_email("secret@example.com").await.unwrap().unwrap();
    assert!(record.stored_secret.unwrap().expose().starts_with("$2b$04$"));
}
