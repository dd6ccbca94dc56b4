//! JSON API over the imputation engine
//!
//! Stateless: the CSV travels in the request body and the cleaned CSV comes
//! back in the response, no session involved.

use axum::{body::Bytes, extract::Query, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::impute::{impute, ColumnFill, FillMethod, ImputeOptions, Scope, SkippedColumn};
use crate::report::MissingReport;
use crate::table::Table;
use crate::AppState;

/// Query parameters for POST /api/impute
#[derive(Debug, Deserialize)]
pub struct ImputeQuery {
    #[serde(default)]
    pub method: FillMethod,
    #[serde(default)]
    pub exclude_non_numeric: bool,
}

/// Response for POST /api/impute
#[derive(Debug, Serialize)]
pub struct ImputeResponse {
    pub method: FillMethod,
    pub scope: Scope,
    pub rows: usize,
    pub columns: usize,
    pub missing_before: usize,
    pub cells_filled: usize,
    pub remaining_missing: usize,
    pub filled: Vec<ColumnFill>,
    pub skipped: Vec<SkippedColumn>,
    /// Cleaned dataset, same header and column order as the input
    pub csv: String,
}

/// POST /api/report
///
/// Shape and per-column missing counts of the CSV body.
pub async fn missing_report(body: Bytes) -> ApiResult<Json<MissingReport>> {
    let table = Table::from_csv_bytes(&body)?;
    Ok(Json(MissingReport::from_table(&table)))
}

/// POST /api/impute?method=mean|median|mode&exclude_non_numeric=bool
pub async fn impute_csv(
    Query(query): Query<ImputeQuery>,
    body: Bytes,
) -> ApiResult<Json<ImputeResponse>> {
    let table = Table::from_csv_bytes(&body)?;
    let options = ImputeOptions::new(
        query.method,
        Scope::from_exclude_non_numeric(query.exclude_non_numeric),
    );

    let report = impute(&table, options);
    debug!(
        "Imputed {} cells with {}, {} remaining",
        report.cells_filled(),
        options.method,
        report.remaining_missing
    );

    let encoded = report
        .table
        .to_csv_bytes()
        .map_err(|e| ApiError::Internal(format!("Failed to encode CSV: {}", e)))?;
    let csv = String::from_utf8(encoded)
        .map_err(|e| ApiError::Internal(format!("Cleaned CSV is not UTF-8: {}", e)))?;

    Ok(Json(ImputeResponse {
        method: options.method,
        scope: options.scope,
        rows: table.row_count(),
        columns: table.column_count(),
        missing_before: table.missing_count(),
        cells_filled: report.cells_filled(),
        remaining_missing: report.remaining_missing,
        filled: report.filled,
        skipped: report.skipped,
        csv,
    }))
}

/// Build JSON imputation routes
pub fn impute_routes() -> Router<AppState> {
    Router::new()
        .route("/api/report", post(missing_report))
        .route("/api/impute", post(impute_csv))
}
