//! HTTP server mode for REST access to the feed

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::FeedConfig;
use crate::error::{Error, Result};
use crate::pagination::BucketedFeedPaginator;

/// App state shared across handlers
#[derive(Clone)]
struct AppState {
    paginator: BucketedFeedPaginator,
    config: FeedConfig,
}

/// Query string for the feed endpoint
#[derive(Debug, Deserialize)]
struct FeedQuery {
    /// Cursor from the previous page
    #[serde(default)]
    cursor: Option<String>,
    /// Items per page
    #[serde(default)]
    page_size: Option<usize>,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Build the router without binding a socket
pub fn router(paginator: BucketedFeedPaginator, config: FeedConfig) -> Router {
    let state = AppState { paginator, config };

    // Build CORS layer - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/feed", get(get_feed))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(paginator: BucketedFeedPaginator, config: FeedConfig, port: u16) -> Result<()> {
    let app = router(paginator, config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// One page of the feed
async fn get_feed(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<FeedQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return error_response(&Error::invalid_value("query", rejection.body_text()))
        }
    };

    let page_size = match state.config.page_size(query.page_size) {
        Ok(size) => size,
        Err(e) => return error_response(&e),
    };

    match state
        .paginator
        .get_page(query.cursor.as_deref(), page_size)
        .await
    {
        Ok(page) => (StatusCode::OK, Json(ApiResponse::success(page))).into_response(),
        Err(e) => {
            tracing::warn!("Feed page failed: {}", e);
            error_response(&e)
        }
    }
}

fn error_response(error: &Error) -> Response {
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else if matches!(error, Error::Timeout { .. }) {
        StatusCode::GATEWAY_TIMEOUT
    } else {
        StatusCode::BAD_GATEWAY
    };
    (
        status,
        Json(ApiResponse::<()>::error(error.to_string())),
    )
        .into_response()
}
