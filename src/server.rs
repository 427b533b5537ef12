// HTTP surface
//
//   GET  /          -> "API is working"
//   POST /download  -> {"message": ...} | {"error": ...}

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::downloader::{DownloadError, DownloadRequest, Downloader};

#[derive(Clone)]
pub struct AppState {
    pub downloader: Arc<Downloader>,
}

impl AppState {
    pub fn new(downloader: Downloader) -> Self {
        Self {
            downloader: Arc::new(downloader),
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<DownloadError> for ApiError {
    fn from(err: DownloadError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(check_api))
        .route("/download", post(download_video))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Any origin may call the API.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

async fn check_api() -> &'static str {
    "API is working"
}

async fn download_video(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageBody>, ApiError> {
    let result = match parse_request(&body) {
        Ok(request) => state.downloader.handle(&request).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(done) => Ok(Json(MessageBody {
            message: done.message(),
        })),
        Err(err) => {
            error!("Error: {}", err);
            Err(err.into())
        }
    }
}

/// The body is parsed by hand so malformed input still gets a JSON error.
fn parse_request(body: &[u8]) -> Result<DownloadRequest, DownloadError> {
    serde_json::from_slice(body).map_err(|e| DownloadError::InvalidBody(e.to_string()))
}
