//! dashkit-inventory library - Inventory Management Dashboard
//!
//! In-memory product records per browser session, with summary cards,
//! category/status filters, category charts and low-stock alerts.

use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use dashkit_common::{BuildInfo, SessionStore};
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub mod api;
pub mod charts;
pub mod error;
pub mod model;
pub mod sample;
pub mod session;
pub mod store;
pub mod summary;

pub use crate::error::{ApiError, ApiResult, InventoryError};
use crate::session::InventorySession;

/// Module name used in logs, health responses and the page header
pub const MODULE_NAME: &str = "dashkit-inventory";

/// Config file stem: `<config_dir>/dashkit/inventory.toml`
pub const CONFIG_MODULE: &str = "inventory";

pub const DEFAULT_PORT: u16 = 5801;

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
    /// Product collections, one per browser session
    pub sessions: SessionStore<InventorySession>,
    /// Products generated for new sessions and by "Generate Sample Data"
    pub sample_size: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(session_idle: Duration, sample_size: usize) -> Self {
        Self {
            sessions: SessionStore::new(session_idle),
            sample_size,
            startup_time: Utc::now(),
        }
    }

    /// Run `f` against the session's inventory, seeding new sessions
    pub async fn with_inventory<R>(
        &self,
        session: Uuid,
        f: impl FnOnce(&mut InventorySession) -> R,
    ) -> R {
        let sample_size = self.sample_size;
        self.sessions
            .with_session(session, || InventorySession::with_sample(sample_size), f)
            .await
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML dashboard and form posts)
        .merge(api::dashboard_routes())
        // JSON API
        .merge(api::product_routes())
        .merge(api::health_routes())
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/static/dashkit-ui.css", get(dashkit_common::html::serve_ui_css))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
