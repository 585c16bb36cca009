// ============================
// rentauth-lib/src/storage.rs
// ============================
//! User store abstraction with in-memory and flat-file implementations.
use crate::error::AuthError;
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use rentauth_common::{StoredSecret, UserRecord};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::NamedTempFile;
use tokio::{fs as tokio_fs, sync::Mutex};

/// File name used by [`FlatFileUserStore`]
pub const USERS_FILE: &str = "users.json";

/// Trait for user store backends.
///
/// Emails passed in are already normalized by the caller; lookups are exact.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user and their stored digest, verbatim
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError>;

    /// Replace the stored digest for a user. Writing the same digest twice is a no-op.
    async fn update_secret(&self, identity_id: &str, digest: &str) -> Result<(), AuthError>;

    /// Insert a new user, rejecting an email that is already taken
    async fn create_user(&self, record: UserRecord) -> Result<(), AuthError>;
}

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        (**self).find_by_email(email).await
    }

    async fn update_secret(&self, identity_id: &str, digest: &str) -> Result<(), AuthError> {
        (**self).update_secret(identity_id, digest).await
    }

    async fn create_user(&self, record: UserRecord) -> Result<(), AuthError> {
        (**self).create_user(record).await
    }
}

/// In-process store keyed by email
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<DashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.users.get(email).map(|entry| entry.value().clone()))
    }

    async fn update_secret(&self, identity_id: &str, digest: &str) -> Result<(), AuthError> {
        let mut record = self
            .users
            .iter_mut()
            .find(|entry| entry.identity.id == identity_id)
            .ok_or_else(|| AuthError::Storage(format!("no user with id {identity_id}")))?;
        record.stored_secret = Some(StoredSecret::new(digest));
        Ok(())
    }

    async fn create_user(&self, record: UserRecord) -> Result<(), AuthError> {
        let email = record.identity.email.clone();
        match self.users.entry(email) {
            Entry::Occupied(_) => Err(AuthError::Conflict(format!(
                "email {} is already registered",
                record.identity.email
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            },
        }
    }
}

/// Flat-file implementation of the [`UserStore`] trait.
///
/// All users live in one JSON document. Writes go to a temp file in the same
/// directory which is then renamed over the original, so readers only ever
/// see a complete document.
#[derive(Debug, Clone)]
pub struct FlatFileUserStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FlatFileUserStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, AuthError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn users_path(&self) -> PathBuf {
        self.root.join(USERS_FILE)
    }

    async fn read_all(&self) -> Result<Vec<UserRecord>, AuthError> {
        let path = self.users_path();
        if !tokio_fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }
        let content = tokio_fs::read_to_string(&path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_all(&self, users: &[UserRecord]) -> Result<(), AuthError> {
        let json = serde_json::to_vec_pretty(users)?;
        let root = self.root.clone();
        let path = self.users_path();

        tokio::task::spawn_blocking(move || -> Result<(), AuthError> {
            let mut tmp = NamedTempFile::new_in(&root)?;
            tmp.write_all(&json)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| AuthError::Io(e.error))?;
            Ok(())
        })
        .await
        .map_err(|e| AuthError::Storage(format!("user file writer failed: {e}")))?
    }
}

#[async_trait]
impl UserStore for FlatFileUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let users = self.read_all().await?;
        Ok(users.into_iter().find(|u| u.identity.email == email))
    }

    async fn update_secret(&self, identity_id: &str, digest: &str) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.read_all().await?;
        let record = users
            .iter_mut()
            .find(|u| u.identity.id == identity_id)
            .ok_or_else(|| AuthError::Storage(format!("no user with id {identity_id}")))?;
        record.stored_secret = Some(StoredSecret::new(digest));
        self.write_all(&users).await
    }

    async fn create_user(&self, record: UserRecord) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.read_all().await?;
        if users
            .iter()
            .any(|u| u.identity.email == record.identity.email)
        {
            return Err(AuthError::Conflict(format!(
                "email {} is already registered",
                record.identity.email
            )));
        }
        users.push(record);
        self.write_all(&users).await
    }
}
