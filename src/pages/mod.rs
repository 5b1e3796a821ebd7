//! Page controllers
//!
//! Each page owns its local state, talks to the backend through
//! [`PageContext`], and exposes that state for the renderers in
//! [`crate::view`]. Actions take `&mut self`, so a page never has more than
//! one request in flight.

mod analysis;
mod auth;
mod history;
mod home;
mod record;
mod settings;
mod stats;
#[cfg(test)]
pub(crate) mod testing;

pub use analysis::{AnalysisPage, DISCLAIMER};
pub use auth::{
    is_valid_email, validate_registration, LoginForm, LoginPage, RegisterForm, RegisterPage,
};
pub use history::HistoryPage;
pub use home::HomePage;
pub use record::{EntryMode, RecordForm, RecordPage, SAVED_MESSAGE};
pub use settings::SettingsPage;
pub use stats::{health_label, stool_type_percentages, DistributionBar, StatsPage, StatsView};

use crate::api::{ApiError, Backend};
use crate::session::{SessionContext, StoreError};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced to the user by page actions
#[derive(Error, Debug)]
pub enum PageError {
    /// Input rejected before any network call
    #[error("{0}")]
    Validation(String),

    #[error("Please log in first")]
    NotLoggedIn,

    /// Backend rejected the stored credentials; they have been cleared
    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Enable developer mode to generate test data")]
    DevModeDisabled,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Session storage error: {0}")]
    Storage(#[from] StoreError),
}

impl PageError {
    pub fn validation(message: impl Into<String>) -> Self {
        PageError::Validation(message.into())
    }

    /// True when the user should be sent to the login page
    pub fn needs_login(&self) -> bool {
        matches!(self, PageError::NotLoggedIn | PageError::SessionExpired)
    }
}

/// Loading state of a page's remote data
#[derive(Debug)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(PageError),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn from_result(result: Result<T, PageError>) -> Self {
        match result {
            Ok(value) => LoadState::Loaded(value),
            Err(e) => LoadState::Failed(e),
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PageError> {
        match self {
            LoadState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Transient message shown at the top of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice::Success(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::Error(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// Dependencies shared by every page
#[derive(Clone)]
pub struct PageContext {
    pub backend: Arc<dyn Backend>,
    pub session: SessionContext,
}

impl PageContext {
    pub fn new(backend: Arc<dyn Backend>, session: SessionContext) -> Self {
        Self { backend, session }
    }

    /// Gate for privileged actions
    pub fn require_login(&self) -> Result<(), PageError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(PageError::NotLoggedIn)
        }
    }

    /// Convert a failed privileged call into a page error. Unauthorized
    /// responses clear the stored credentials.
    pub fn api_error(&self, err: ApiError) -> PageError {
        if !err.is_unauthorized() {
            return PageError::Api(err);
        }

        tracing::info!("Backend rejected the session token: {}", err);
        if let Err(e) = self.session.sign_out() {
            tracing::warn!("Failed to clear expired session: {}", e);
        }
        PageError::SessionExpired
    }
}
