use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, instrument};

use crate::observability::{Metrics, MetricsError};

const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Renders every registered series (HTTP traffic, backend calls, booking
/// operations and cost estimates) in the Prometheus text format. Served on
/// the main listener and, when configured, on the dedicated metrics port.
#[instrument(name = "metrics_handler", skip(metrics))]
pub async fn metrics_handler(State(metrics): State<Arc<Metrics>>) -> Response {
    metrics
        .encode()
        .map(|exposition| {
            ([(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], exposition).into_response()
        })
        .unwrap_or_else(encoding_failure)
}

fn encoding_failure(err: MetricsError) -> Response {
    error!(error = %err, "Metrics exposition could not be rendered");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "metrics exposition unavailable",
    )
        .into_response()
}
