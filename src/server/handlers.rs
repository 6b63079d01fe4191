//! HTTP request handlers
//!
//! Contains handlers for all HTTP endpoints.

use std::time::Instant;

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{debug, error, instrument};

use super::AppState;
use crate::collector::AttributeValue;
use crate::error::AppResult;
use crate::transformer::{PrometheusFormatter, CONTENT_TYPE, READY_KEY};

/// Query parameter selecting families by exact name; may repeat
pub const NAME_FILTER_PARAM: &str = "name[]";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Health status
    status: String,
    /// Application version
    version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Family names requested with `name[]`, in query order
pub fn requested_names(query: Option<&str>) -> Vec<String> {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .filter(|(key, _)| key == NAME_FILTER_PARAM)
                .map(|(_, value)| value.into_owned())
                .collect()
        })
        .unwrap_or_default()
}

/// Metrics endpoint - runs one translation pass and returns Prometheus format
#[instrument(skip(state, query), name = "metrics_handler")]
pub async fn metrics(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<impl IntoResponse> {
    let start = Instant::now();
    let names = requested_names(query.as_deref());

    let mut families = state.engine.scrape(&state.source).await?;
    let translated = families.len();
    families.extend(state.engine.metrics().to_families());

    let output = PrometheusFormatter::new()
        .with_name_filter(names)
        .format(&families);

    debug!(
        duration_ms = start.elapsed().as_millis() as u64,
        families = translated,
        bytes = output.len(),
        "Metrics request complete"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, CONTENT_TYPE)],
        output,
    ))
}

/// Readiness endpoint
///
/// Clears the attribute value store, runs one pass to repopulate it and maps
/// the node's `Ready` flag to a status: 200 if ready, 503 if not, 501 if the
/// flag is missing.
#[instrument(skip(state), name = "ready_handler")]
pub async fn ready(State(state): State<AppState>) -> StatusCode {
    let store = state.engine.store();
    store.reset();

    if let Err(e) = state.engine.scrape(&state.source).await {
        error!(error = %e, "Translation pass failed");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    match store.get(READY_KEY) {
        Some(AttributeValue::Boolean(true)) => StatusCode::OK,
        Some(AttributeValue::Boolean(false)) => StatusCode::SERVICE_UNAVAILABLE,
        other => {
            debug!(value = ?other, key = READY_KEY, "Readiness flag not available");
            StatusCode::NOT_IMPLEMENTED
        }
    }
}
