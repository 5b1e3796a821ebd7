//! Session gateway
//!
//! The token/user pair lives in a [`KeyValueStore`] under two keys. Every
//! page and the API client read and write it through one cloneable
//! [`SessionContext`] instead of touching storage directly.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

use crate::models::{AuthResponse, User};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Storage key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the serialized user
pub const USER_KEY: &str = "user";

/// Shared handle to the persisted session
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Session kept only in memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Session persisted to a JSON file
    pub fn open_file(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::new(Arc::new(FileStore::open(path)?)))
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        match self.store.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    /// Current user, if one is stored and readable
    pub fn user(&self) -> Option<User> {
        let raw = match self.store.get_item(USER_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to read session user: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Stored user is not valid JSON: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Persist a successful login or registration
    pub fn sign_in(&self, auth: &AuthResponse) -> Result<User, StoreError> {
        let user = auth.user();
        self.store.set_item(TOKEN_KEY, &auth.token)?;
        self.store.set_item(USER_KEY, &serde_json::to_string(&user)?)?;
        tracing::info!(user_id = %user.user_id, "Signed in");
        Ok(user)
    }

    /// Forget the stored credentials
    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.store.remove_item(TOKEN_KEY)?;
        self.store.remove_item(USER_KEY)?;
        tracing::info!("Signed out");
        Ok(())
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
