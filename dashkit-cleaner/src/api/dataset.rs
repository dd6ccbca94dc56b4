//! Dataset upload, cleaning and download
//!
//! Form posts answer with a 303 back to `/`; the outcome is shown on the
//! next page render through the session's flash message.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use dashkit_common::{Flash, SessionId};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::impute::FillMethod;
use crate::session::{CleanOptions, CleanerSession, CLEANED_FILE_NAME};
use crate::table::Table;
use crate::AppState;

/// Multipart field carrying the CSV file
const FILE_FIELD: &str = "file";

const NO_FILE_MESSAGE: &str = "Please choose a CSV file to upload";

/// Sidebar form submitted by the Clean Data button
///
/// Unchecked checkboxes are simply absent from the body.
#[derive(Debug, Deserialize)]
pub struct CleanForm {
    #[serde(default)]
    pub method: FillMethod,
    #[serde(default)]
    pub exclude_non_numeric: Option<String>,
    #[serde(default)]
    pub show_download: Option<String>,
}

impl CleanForm {
    pub fn options(&self) -> CleanOptions {
        CleanOptions {
            method: self.method,
            exclude_non_numeric: self.exclude_non_numeric.is_some(),
            show_download: self.show_download.is_some(),
        }
    }
}

/// POST /upload
///
/// Parses the uploaded CSV and stores it in the session. A file that fails
/// to parse clears the previous dataset and surfaces the parse error.
pub async fn upload_dataset(
    State(state): State<AppState>,
    session: SessionId,
    mut multipart: Multipart,
) -> Response {
    let outcome = match read_file_field(&mut multipart).await {
        Ok((file_name, bytes)) => Table::from_csv_bytes(&bytes)
            .map(|table| (file_name, table))
            .map_err(ApiError::from),
        Err(e) => Err(e),
    };

    state
        .sessions
        .with_session(session.id(), CleanerSession::default, |s| match outcome {
            Ok((file_name, table)) => {
                info!(
                    "Uploaded {}: {} rows x {} columns, {} missing",
                    file_name,
                    table.row_count(),
                    table.column_count(),
                    table.missing_count()
                );
                s.set_dataset(file_name, table);
                s.flash = Some(Flash::success("File uploaded successfully!"));
            }
            Err(e) => {
                warn!("Upload rejected: {}", e);
                s.clear_dataset();
                s.flash = Some(Flash::error(e.to_string()));
            }
        })
        .await;

    session.attach(Redirect::to("/"))
}

async fn read_file_field(multipart: &mut Multipart) -> ApiResult<(String, Bytes)> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or("upload.csv")
            .to_string();
        let bytes = field.bytes().await.map_err(upload_error)?;

        if bytes.is_empty() {
            return Err(ApiError::BadRequest(NO_FILE_MESSAGE.to_string()));
        }
        return Ok((file_name, bytes));
    }

    Err(ApiError::BadRequest(NO_FILE_MESSAGE.to_string()))
}

fn upload_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(format!("Invalid upload: {}", e.body_text()))
    }
}

/// POST /clean
pub async fn clean_dataset(
    State(state): State<AppState>,
    session: SessionId,
    Form(form): Form<CleanForm>,
) -> Response {
    let options = form.options();

    state
        .sessions
        .with_session(session.id(), CleanerSession::default, |s| {
            if s.clean(options).is_none() {
                s.flash = Some(Flash::warning("Please upload a CSV file before cleaning"));
            }
        })
        .await;

    session.attach(Redirect::to("/"))
}

/// GET /download
///
/// Serves the latest cleaned dataset as `cleaned_dataset.csv`.
pub async fn download_cleaned(
    State(state): State<AppState>,
    session: SessionId,
) -> ApiResult<Response> {
    let encoded = state
        .sessions
        .with_session(session.id(), CleanerSession::default, |s| {
            s.result.as_ref().map(|report| report.table.to_csv_bytes())
        })
        .await;

    let bytes = encoded
        .ok_or_else(|| {
            ApiError::NotFound("No cleaned dataset; upload a file and run Clean Data first".to_string())
        })?
        .map_err(|e| ApiError::Internal(format!("Failed to encode CSV: {}", e)))?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", CLEANED_FILE_NAME),
        ),
    ];

    Ok(session.attach((StatusCode::OK, headers, bytes).into_response()))
}

/// Build dataset routes
pub fn dataset_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_dataset))
        .route("/clean", post(clean_dataset))
        .route("/download", get(download_cleaned))
}
