//! JSON API over the session's inventory
//!
//! Same session cookie as the dashboard, so changes made here show up on
//! the page and vice versa.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use dashkit_common::SessionId;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::model::{NewProduct, Product, StockLevels};
use crate::summary::{
    low_stock_alerts, quantity_by_category, summarize, CategoryTotal, InventorySummary,
    LowStockAlert, ProductFilter,
};
use crate::AppState;

/// Upper bound for `POST /api/sample`
pub const MAX_SAMPLE_SIZE: usize = 1000;

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: Option<InventorySummary>,
    pub by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub alerts: Vec<LowStockAlert>,
    pub total: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct SampleRequest {
    pub count: Option<usize>,
}

/// Collection size and the id the next product will get
#[derive(Debug, Serialize)]
pub struct StoreStateResponse {
    pub total: usize,
    pub next_id: String,
}

/// GET /api/products?category=…&status=…
pub async fn list_products(
    State(state): State<AppState>,
    session: SessionId,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let filter = ProductFilter::from_query_pairs(&params)?;
    let products: Vec<Product> = state
        .with_inventory(session.id(), |s| {
            filter
                .apply(s.store.products())
                .into_iter()
                .cloned()
                .collect()
        })
        .await;

    let total = products.len();
    Ok(session.attach(Json(ProductListResponse { products, total })))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    session: SessionId,
    Json(new): Json<NewProduct>,
) -> ApiResult<Response> {
    let product = state
        .with_inventory(session.id(), |s| s.store.add_product(new))
        .await?;
    Ok(session.attach((StatusCode::CREATED, Json(product))))
}

/// PUT /api/products/:id
pub async fn update_product(
    State(state): State<AppState>,
    session: SessionId,
    Path(id): Path<String>,
    Json(levels): Json<StockLevels>,
) -> ApiResult<Response> {
    let product = state
        .with_inventory(session.id(), |s| s.store.update_levels(&id, levels))
        .await?;
    Ok(session.attach(Json(product)))
}

/// GET /api/summary
pub async fn get_summary(State(state): State<AppState>, session: SessionId) -> Response {
    let response = state
        .with_inventory(session.id(), |s| SummaryResponse {
            summary: summarize(s.store.products()),
            by_category: quantity_by_category(s.store.products()),
        })
        .await;
    session.attach(Json(response))
}

/// GET /api/alerts
pub async fn get_alerts(State(state): State<AppState>, session: SessionId) -> Response {
    let alerts = state
        .with_inventory(session.id(), |s| low_stock_alerts(s.store.products()))
        .await;
    let total = alerts.len();
    session.attach(Json(AlertsResponse { alerts, total }))
}

/// POST /api/sample
///
/// Body is optional; without `count` the configured sample size is used.
pub async fn regenerate_sample(
    State(state): State<AppState>,
    session: SessionId,
    body: Option<Json<SampleRequest>>,
) -> ApiResult<Response> {
    let count = body
        .and_then(|Json(request)| request.count)
        .unwrap_or(state.sample_size);
    if count > MAX_SAMPLE_SIZE {
        return Err(ApiError::BadRequest(format!(
            "Sample size {} exceeds the maximum of {}",
            count, MAX_SAMPLE_SIZE
        )));
    }

    let response = state
        .with_inventory(session.id(), |s| {
            let mut rng = rand::thread_rng();
            s.store.regenerate_sample(count, &mut rng);
            StoreStateResponse {
                total: s.store.len(),
                next_id: s.store.next_product_id(),
            }
        })
        .await;
    Ok(session.attach(Json(response)))
}

/// POST /api/clear
pub async fn clear_products(State(state): State<AppState>, session: SessionId) -> Response {
    let response = state
        .with_inventory(session.id(), |s| {
            s.store.clear();
            StoreStateResponse {
                total: s.store.len(),
                next_id: s.store.next_product_id(),
            }
        })
        .await;
    session.attach(Json(response))
}

/// Build JSON product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/:id", put(update_product))
        .route("/api/summary", get(get_summary))
        .route("/api/alerts", get(get_alerts))
        .route("/api/sample", post(regenerate_sample))
        .route("/api/clear", post(clear_products))
}
