//! HTTP query server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/summary/{city}` | Today's rollup for a city |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! `/summary/{city}` always answers `200` with
//! `{ "avgTemp", "maxTemp", "minTemp", "dominantWeather" }`, using `null`
//! when the city has no readings today. A store failure answers `500`:
//!
//! ```json
//! { "error": { "code": "internal", "message": "..." } }
//! ```
//!
//! All origins, methods, and headers are permitted (CORS).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::summary::{DailySummary, SummaryAggregator};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub summaries: Arc<SummaryAggregator>,
}

/// Build the router. Exposed separately from [`run_server`] for tests.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/summary/{city}", get(handle_summary))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Bind to `bind_addr` and serve until `shutdown` resolves.
pub async fn run_server<F>(bind_addr: &str, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /summary/{city} ============

async fn handle_summary(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<DailySummary>, AppError> {
    let summary = state.summaries.summarize(&city).await.map_err(|e| {
        tracing::error!(city = %city, "Summary query failed: {:#}", e);
        internal(format!("failed to compute summary for {}", city))
    })?;

    Ok(Json(summary))
}
