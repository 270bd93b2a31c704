use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::models::{
    BackendError, Booking, BookingForm, CostEstimate, ServiceError, ServiceType,
    UpdateBookingRequest,
};
use crate::repositories::booking_repository::FALLBACK_REJECTION_MESSAGE;
use crate::services::BookingService;

/// Shared application state containing all services
#[derive(Clone)]
pub struct ApiState {
    pub booking_service: Arc<BookingService>,
}

/// One row of the public rate table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceTypeRate {
    pub service_type: ServiceType,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_rate: Decimal,
}

/// Create API router with all booking endpoints
pub fn create_api_router(booking_service: Arc<BookingService>) -> Router {
    let state = ApiState { booking_service };

    Router::new()
        .route("/api/service-types", get(list_service_types))
        .route("/api/bookings/estimate", post(estimate_booking))
        .route("/api/bookings", get(list_bookings).post(create_booking))
        .route(
            "/api/bookings/:booking_id",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
        .route("/api/bookings/:booking_id/cancel", post(cancel_booking))
        .with_state(state)
}

// =============================================================================
// ESTIMATE ENDPOINTS
// =============================================================================

/// Base hourly rate for every bookable service
#[instrument(name = "list_service_types")]
pub async fn list_service_types() -> Json<Vec<ServiceTypeRate>> {
    Json(
        ServiceType::ALL
            .iter()
            .map(|service_type| ServiceTypeRate {
                service_type: *service_type,
                base_rate: service_type.base_rate(),
            })
            .collect(),
    )
}

/// Estimate the cost of an in-progress booking form
#[instrument(name = "estimate_booking", skip(state, form), fields(
    service_type = %form.service_type,
    pets = form.pets.len(),
))]
pub async fn estimate_booking(
    State(state): State<ApiState>,
    Json(form): Json<BookingForm>,
) -> Json<CostEstimate> {
    let estimate = state.booking_service.estimate(&form);
    info!(total = %estimate.total, "Computed cost estimate");
    Json(estimate)
}

// =============================================================================
// BOOKING ENDPOINTS
// =============================================================================

/// Validate and submit a booking form
#[instrument(name = "create_booking", skip(state, form), fields(
    service_type = %form.service_type,
    pets = form.pets.len(),
))]
pub async fn create_booking(
    State(state): State<ApiState>,
    Json(form): Json<BookingForm>,
) -> Result<(StatusCode, Json<Booking>), (StatusCode, Json<Value>)> {
    crate::info_with_trace!("Creating booking");

    match state.booking_service.submit(&form).await {
        Ok(booking) => {
            crate::info_with_trace!("Successfully created booking {}", booking.id);
            Ok((StatusCode::CREATED, Json(booking)))
        }
        Err(err) => {
            crate::error_with_trace!("Failed to create booking: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

#[instrument(name = "list_bookings", skip(state))]
pub async fn list_bookings(
    State(state): State<ApiState>,
) -> Result<Json<Vec<Booking>>, (StatusCode, Json<Value>)> {
    match state.booking_service.list_bookings().await {
        Ok(bookings) => {
            info!("Successfully listed {} bookings", bookings.len());
            Ok(Json(bookings))
        }
        Err(err) => {
            error!("Failed to list bookings: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

#[instrument(name = "get_booking", skip(state), fields(booking_id = %booking_id))]
pub async fn get_booking(
    State(state): State<ApiState>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, (StatusCode, Json<Value>)> {
    match state.booking_service.get_booking(&booking_id).await {
        Ok(booking) => Ok(Json(booking)),
        Err(err) => {
            error!("Failed to get booking {}: {}", booking_id, err);
            Err(service_error_to_response(err))
        }
    }
}

/// Assign a sitter, change status or edit notes
#[instrument(name = "update_booking", skip(state, request), fields(
    booking_id = %booking_id,
    has_sitter = request.sitter.is_some(),
    status = ?request.status,
))]
pub async fn update_booking(
    State(state): State<ApiState>,
    Path(booking_id): Path<String>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<Booking>, (StatusCode, Json<Value>)> {
    crate::info_with_trace!("Updating booking {}", booking_id);

    match state
        .booking_service
        .update_booking(&booking_id, request)
        .await
    {
        Ok(booking) => {
            crate::info_with_trace!("Successfully updated booking");
            Ok(Json(booking))
        }
        Err(err) => {
            crate::error_with_trace!("Failed to update booking: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

#[instrument(name = "cancel_booking", skip(state), fields(booking_id = %booking_id))]
pub async fn cancel_booking(
    State(state): State<ApiState>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, (StatusCode, Json<Value>)> {
    crate::info_with_trace!("Cancelling booking {}", booking_id);

    match state.booking_service.cancel_booking(&booking_id).await {
        Ok(booking) => Ok(Json(booking)),
        Err(err) => {
            crate::error_with_trace!("Failed to cancel booking: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

#[instrument(name = "delete_booking", skip(state), fields(booking_id = %booking_id))]
pub async fn delete_booking(
    State(state): State<ApiState>,
    Path(booking_id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    crate::info_with_trace!("Deleting booking {}", booking_id);

    match state.booking_service.delete_booking(&booking_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(err) => {
            crate::error_with_trace!("Failed to delete booking: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Convert ServiceError to HTTP response
pub fn service_error_to_response(err: ServiceError) -> (StatusCode, Json<Value>) {
    let (status, message) = match err {
        ServiceError::BookingNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::ValidationError { message } => (StatusCode::BAD_REQUEST, message),
        ServiceError::Backend { source } => match source {
            BackendError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            BackendError::Rejected { status, message } => {
                let status = StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, message)
            }
            BackendError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "Booking backend timed out".to_string(),
            ),
            BackendError::ConnectionFailed { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Booking backend unavailable".to_string(),
            ),
            BackendError::Unauthorized { .. }
            | BackendError::Serialization { .. }
            | BackendError::InvalidResponse { .. } => (
                StatusCode::BAD_GATEWAY,
                FALLBACK_REJECTION_MESSAGE.to_string(),
            ),
        },
        ServiceError::Configuration { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Configuration error".to_string(),
        ),
    };

    (
        status,
        Json(json!({
            "error": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
