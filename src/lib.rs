//! # gutlog
//!
//! Terminal client for a bowel-movement health log. Records are captured
//! locally (by hand or with a live timer), sent to the backend REST API, and
//! the backend's statistics and AI analysis are rendered as text.
//!
//! ## Modules
//!
//! - [`api`]: `Backend` trait and the reqwest based [`ApiClient`]
//! - [`session`]: persisted token/user behind [`SessionContext`]
//! - [`pages`]: page controllers (home, login, register, record, history,
//!   stats, analysis, settings)
//! - [`router`]: path to page mapping and navigation entries
//! - [`view`]: shared layout and text renderers
//! - [`timer`]: one-second duration timer
//! - [`devtools`]: synthetic records for developer mode
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gutlog::{ApiClient, PageContext, SessionContext, StatsPage};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SessionContext::open_file(std::path::Path::new("session.json"))?;
//!     let client = ApiClient::new("http://localhost:8001/api/v1", session.clone())?;
//!     let ctx = PageContext::new(Arc::new(client), session);
//!
//!     let mut stats = StatsPage::new(ctx);
//!     stats.open().await;
//!     print!("{}", gutlog::view::render_stats(&stats)?);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod devtools;
pub mod logging;
pub mod models;
pub mod pages;
pub mod router;
pub mod session;
pub mod timer;
pub mod view;

pub use api::{ApiClient, ApiError, ApiResult, Backend, DEFAULT_API_BASE};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};

pub use pages::{
    AnalysisPage, HistoryPage, HomePage, LoadState, LoginPage, Notice, PageContext, PageError,
    RecordPage, RegisterPage, SettingsPage, StatsPage,
};

pub use router::Route;

pub use session::{FileStore, KeyValueStore, MemoryStore, SessionContext, StoreError};
