//! Build information API endpoint

use axum::response::Json;
use dashkit_common::BuildInfo;

/// GET /api/buildinfo
pub async fn get_build_info() -> Json<BuildInfo> {
    Json(crate::build_info())
}
