use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerConfig;
use crate::handlers::{
    api, cors_middleware, health_check, metrics_handler, request_id_middleware,
    request_validation_middleware, security_headers_middleware, RequestLimits,
};
use crate::observability::{observability_middleware, Metrics};
use crate::services::BookingService;

/// Assemble the full HTTP surface: health, metrics, booking API and the
/// middleware stack.
pub fn create_app(
    metrics: Arc<Metrics>,
    booking_service: Arc<BookingService>,
    server: &ServerConfig,
) -> Router {
    let metrics_for_middleware = metrics.clone();

    Router::new()
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
        .merge(api::create_api_router(booking_service))
        // Order matters: the last layer added runs first
        .layer(DefaultBodyLimit::max(server.max_request_size))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn_with_state(
            RequestLimits::new(server.max_request_size),
            request_validation_middleware,
        ))
        .layer(middleware::from_fn(move |req: Request, next: Next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
        .layer(middleware::from_fn(cors_middleware))
        .layer(middleware::from_fn(request_id_middleware))
}
