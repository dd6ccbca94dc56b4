//! dashkit-cleaner library - Missing Data Cleaner
//!
//! Upload a CSV file, review its missing values, fill them with a per-column
//! mean, median or mode, and download the cleaned dataset.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use chrono::{DateTime, Utc};
use dashkit_common::{BuildInfo, SessionStore};
use std::time::Duration;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod impute;
pub mod report;
pub mod session;
pub mod table;

pub use crate::error::{ApiError, ApiResult};
use crate::session::CleanerSession;

/// Module name used in logs, health responses and the page header
pub const MODULE_NAME: &str = "dashkit-cleaner";

/// Config file stem: `<config_dir>/dashkit/cleaner.toml`
pub const CONFIG_MODULE: &str = "cleaner";

pub const DEFAULT_PORT: u16 = 5802;

/// Default upload limit (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Build identification captured by build.rs
pub fn build_info() -> BuildInfo {
    BuildInfo {
        module: MODULE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        git_hash: env!("GIT_HASH"),
        build_timestamp: env!("BUILD_TIMESTAMP"),
        build_profile: env!("BUILD_PROFILE"),
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Uploaded datasets and cleaning results, one entry per browser session
    pub sessions: SessionStore<CleanerSession>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Request body limit for uploads
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(session_idle: Duration, max_upload_bytes: usize) -> Self {
        Self {
            sessions: SessionStore::new(session_idle),
            startup_time: Utc::now(),
            max_upload_bytes,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        // UI routes (HTML pages and form posts)
        .merge(api::ui_routes())
        .merge(api::dataset_routes())
        // JSON API
        .merge(api::impute_routes())
        .merge(api::health_routes())
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/static/dashkit-ui.css", get(dashkit_common::html::serve_ui_css))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
