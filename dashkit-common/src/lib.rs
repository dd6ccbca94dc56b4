//! # Dashkit Common Library
//!
//! Shared code for the dashkit services:
//! - Error type and result alias
//! - Configuration loading (CLI / environment / TOML / compiled defaults)
//! - Tracing subscriber bootstrap
//! - Cookie-keyed per-session state store
//! - HTML page shell, escaping and flash notices
//! - Build identification
//! - Graceful shutdown signal

pub mod build_info;
pub mod config;
pub mod error;
pub mod html;
pub mod logging;
pub mod session;
pub mod shutdown;

pub use build_info::BuildInfo;
pub use error::{Error, Result};
pub use html::{Flash, FlashLevel};
pub use session::{SessionId, SessionStore};
