//! Integration tests for dashkit-cleaner HTTP endpoints
//!
//! Tests cover:
//! - Health and build info
//! - Upload / clean / download flow through the session cookie
//! - Stateless JSON imputation and missing-value report
//! - Error responses

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use dashkit_cleaner::{build_router, AppState, DEFAULT_MAX_UPLOAD_BYTES};
use http_body_util::BodyExt;
use serde_json::Value;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot` method

const PEOPLE_CSV: &str = "Name,Age,Salary\nBav1,28,\nMoena,,45000\nKumar,30,50000\n";
const BOUNDARY: &str = "dashkit-test-boundary";

/// Test helper: Create app with a fresh session store
fn setup_app() -> Router {
    let state = AppState::new(Duration::from_secs(3600), DEFAULT_MAX_UPLOAD_BYTES);
    build_router(state)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_csv(uri: &str, csv: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(csv.to_string()))
        .unwrap()
}

fn upload(file_name: &str, csv: &str, cookie: Option<&str>) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = file_name,
        csv = csv
    );
    let mut builder = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Test helper: `name=value` pair from the response's Set-Cookie header
fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Should set session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn assert_redirect_home(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
}

// =============================================================================
// Health and build info
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app();

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "dashkit-cleaner");
    assert!(body["version"].is_string());
    assert_eq!(body["active_sessions"], 0);
}

#[tokio::test]
async fn test_build_info_endpoint() {
    let app = setup_app();

    let response = app.oneshot(get("/api/buildinfo", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["module"], "dashkit-cleaner");
    assert!(body["git_hash"].is_string());
    assert!(body["build_profile"].is_string());
}

#[tokio::test]
async fn test_stylesheet_served() {
    let app = setup_app();

    let response = app.oneshot(get("/static/dashkit-ui.css", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/css"));
}

// =============================================================================
// Page and session flow
// =============================================================================

#[tokio::test]
async fn test_first_visit_shows_guidance() {
    let app = setup_app();

    let response = app.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_some());

    let html = body_text(response).await;
    assert!(html.contains("Please upload a CSV file to get started"));
    assert!(html.contains("Example Dataset"));
    assert!(html.contains("Kumar"));
}

#[tokio::test]
async fn test_upload_clean_download_flow() {
    let app = setup_app();

    let response = app
        .clone()
        .oneshot(upload("people.csv", PEOPLE_CSV, None))
        .await
        .unwrap();
    assert_redirect_home(&response);
    let cookie = session_cookie(&response);

    let html = body_text(app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("File uploaded successfully!"));
    assert!(html.contains("people.csv"));
    assert!(html.contains("Shape: 3 rows, 3 columns"));
    assert!(html.contains("Age: 1 missing values"));
    assert!(html.contains("Salary: 1 missing values"));
    assert!(html.contains("<svg"));

    // Flash is shown once
    let html = body_text(app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(!html.contains("File uploaded successfully!"));

    let response = app
        .clone()
        .oneshot(post_form("/clean", "method=mean&show_download=on", &cookie))
        .await
        .unwrap();
    assert_redirect_home(&response);

    let html = body_text(app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("Cleaned Dataset"));
    assert!(html.contains("All missing values have been filled!"));
    assert!(html.contains(r#"href="/download""#));

    let response = app.clone().oneshot(get("/download", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"cleaned_dataset.csv\""
    );
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert_eq!(
        body_text(response).await,
        "Name,Age,Salary\nBav1,28,47500\nMoena,29,45000\nKumar,30,50000\n"
    );
}

#[tokio::test]
async fn test_clean_with_download_hidden() {
    let app = setup_app();

    let response = app
        .clone()
        .oneshot(upload("people.csv", PEOPLE_CSV, None))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    app.clone()
        .oneshot(post_form("/clean", "method=median", &cookie))
        .await
        .unwrap();

    let html = body_text(app.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("All missing values have been filled!"));
    assert!(!html.contains(r#"href="/download""#));
}

#[tokio::test]
async fn test_mean_on_text_column_warns() {
    let app = setup_app();
    let csv = "city,n\nOslo,1\n,2\n";

    let response = app
        .clone()
        .oneshot(upload("cities.csv", csv, None))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    app.clone()
        .oneshot(post_form("/clean", "method=mean&show_download=on", &cookie))
        .await
        .unwrap();

    let html = body_text(app.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("There are still 1 missing values"));
}

#[tokio::test]
async fn test_unparseable_upload_flashes_error() {
    let app = setup_app();

    let response = app
        .clone()
        .oneshot(upload("broken.csv", "a,b\n1,2,3\n", None))
        .await
        .unwrap();
    assert_redirect_home(&response);
    let cookie = session_cookie(&response);

    let html = body_text(app.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("notice-error"));
    assert!(html.contains("Could not parse CSV"));
    assert!(html.contains("Please upload a CSV file to get started"));
}

#[tokio::test]
async fn test_clean_without_upload_warns() {
    let app = setup_app();

    let response = app.clone().oneshot(get("/", None)).await.unwrap();
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(post_form("/clean", "method=mode", &cookie))
        .await
        .unwrap();
    assert_redirect_home(&response);

    let html = body_text(app.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("Please upload a CSV file before cleaning"));
}

#[tokio::test]
async fn test_download_without_result_is_not_found() {
    let app = setup_app();

    let response = app.oneshot(get("/download", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = setup_app();

    let response = app
        .clone()
        .oneshot(upload("people.csv", PEOPLE_CSV, None))
        .await
        .unwrap();
    let first = session_cookie(&response);

    let response = app.clone().oneshot(get("/", None)).await.unwrap();
    let second = session_cookie(&response);
    assert_ne!(first, second);

    let html = body_text(app.oneshot(get("/", Some(&second))).await.unwrap()).await;
    assert!(!html.contains("people.csv"));
}

// =============================================================================
// JSON API
// =============================================================================

#[tokio::test]
async fn test_api_impute_mean() {
    let app = setup_app();

    let response = app
        .oneshot(post_csv("/api/impute?method=mean", PEOPLE_CSV))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["remaining_missing"], 0);
    assert_eq!(body["missing_before"], 2);
    assert_eq!(body["cells_filled"], 2);
    assert_eq!(body["method"], "mean");
    assert_eq!(body["scope"], "all_columns");
    assert_eq!(body["filled"][0]["column"], "Age");
    assert_eq!(body["filled"][0]["value"], 29.0);
    assert_eq!(body["filled"][1]["column"], "Salary");
    assert_eq!(body["filled"][1]["value"], 47500.0);
    assert_eq!(
        body["csv"],
        "Name,Age,Salary\nBav1,28,47500\nMoena,29,45000\nKumar,30,50000\n"
    );
}

#[tokio::test]
async fn test_api_impute_median_skips_text_column() {
    let app = setup_app();

    let response = app
        .oneshot(post_csv("/api/impute?method=median", "city,n\nOslo,1\n,\nBergen,3\n"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["remaining_missing"], 1);
    assert_eq!(body["skipped"][0]["column"], "city");
    assert_eq!(body["skipped"][0]["reason"], "non_numeric");
    assert_eq!(body["filled"][0]["value"], 2.0);
}

#[tokio::test]
async fn test_api_impute_treats_nan_spellings_as_missing() {
    let app = setup_app();

    let response = app
        .oneshot(post_csv("/api/impute?method=mean", "a,b\n1,x\nNAN,y\n,z\n3,w\n"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["missing_before"], 2);
    assert_eq!(body["remaining_missing"], 0);
    assert_eq!(body["filled"][0]["value"], 2.0);
    assert_eq!(body["csv"], "a,b\n1,x\n2,y\n2,z\n3,w\n");
}

#[tokio::test]
async fn test_api_impute_mode_excluding_text() {
    let app = setup_app();

    let response = app
        .oneshot(post_csv(
            "/api/impute?method=mode&exclude_non_numeric=true",
            "city,n\nOslo,1\n,1\nBergen,\n",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["scope"], "numeric_only");
    assert_eq!(body["remaining_missing"], 1);
    assert_eq!(body["skipped"][0]["reason"], "out_of_scope");
    assert_eq!(body["csv"], "city,n\nOslo,1\n,1\nBergen,1\n");
}

#[tokio::test]
async fn test_api_report() {
    let app = setup_app();

    let response = app.oneshot(post_csv("/api/report", PEOPLE_CSV)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["rows"], 3);
    assert_eq!(body["columns"], 3);
    assert_eq!(body["total_missing"], 2);
    assert_eq!(body["per_column"][0]["name"], "Name");
    assert_eq!(body["per_column"][0]["column_type"], "text");
    assert_eq!(body["per_column"][1]["missing"], 1);
}

#[tokio::test]
async fn test_api_impute_rejects_empty_body() {
    let app = setup_app();

    let response = app.oneshot(post_csv("/api/impute", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_CSV");
}

#[tokio::test]
async fn test_api_impute_rejects_unknown_method() {
    let app = setup_app();

    let response = app
        .oneshot(post_csv("/api/impute?method=average", PEOPLE_CSV))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
