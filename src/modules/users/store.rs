//! Credential lookup used by the login and refresh flows.

use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use super::model::UserCredentials;

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("failed to read users file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid users file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate user {0}")]
    Duplicate(String),
}

/// Source of user credentials. Lookups by email are case-insensitive.
#[async_trait]
pub trait CredentialStore: Send + Sync + Debug {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, CredentialStoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserCredentials>, CredentialStoreError>;
}

/// Read-only store held in memory, loaded once at startup.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: HashMap<String, UserCredentials>,
    /// lowercased email -> id
    email_index: HashMap<String, String>,
}

impl InMemoryCredentialStore {
    /// Rejects duplicate ids and duplicate emails.
    pub fn new(users: Vec<UserCredentials>) -> Result<Self, CredentialStoreError> {
        let mut store = Self::default();

        for user in users {
            let email_key = user.email.to_lowercase();
            if store.users.contains_key(&user.id) {
                return Err(CredentialStoreError::Duplicate(user.id));
            }
            if store.email_index.contains_key(&email_key) {
                return Err(CredentialStoreError::Duplicate(user.email));
            }
            store.email_index.insert(email_key, user.id.clone());
            store.users.insert(user.id.clone(), user);
        }

        Ok(store)
    }

    /// Loads a JSON array of [`UserCredentials`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CredentialStoreError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CredentialStoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let users: Vec<UserCredentials> =
            serde_json::from_str(&raw).map_err(|source| CredentialStoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let store = Self::new(users)?;
        info!(path = %path.display(), users = store.len(), "Loaded credential store");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, CredentialStoreError> {
        Ok(self
            .email_index
            .get(&email.trim().to_lowercase())
            .and_then(|id| self.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserCredentials>, CredentialStoreError> {
        Ok(self.users.get(id).cloned())
    }
}
