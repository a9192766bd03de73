//! # Momo Sandbox Library
//!
//! Mock mobile-money provider: collections, disbursements and remittances on top
//! of a backchannel authorization token lifecycle (issue, validate, exchange).

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod simulation;

// Re-export commonly used types
pub use api::{ApiServer, AppState};
pub use app::AppContext;
pub use config::AppConfig;
pub use error::{AuthError, Result, SandboxError};
