use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    validate_id, BackendError, Booking, BookingForm, BookingStatus, CostEstimate, ServiceError,
    ServiceResult, ServiceType, UpdateBookingRequest, Validate,
};
use crate::observability::Metrics;
use crate::repositories::BookingRepository;

/// Service for estimating, submitting and managing bookings
pub struct BookingService {
    repository: Arc<dyn BookingRepository>,
    metrics: Option<Arc<Metrics>>,
}

impl BookingService {
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self {
            repository,
            metrics: None,
        }
    }

    pub fn new_with_metrics(
        repository: Arc<dyn BookingRepository>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            repository,
            metrics: Some(metrics),
        }
    }

    /// Estimate the cost of the form as it currently stands
    #[instrument(skip(self, form), fields(service_type = %form.service_type, pets = form.pets.len()))]
    pub fn estimate(&self, form: &BookingForm) -> CostEstimate {
        let estimate = form.estimate();
        if let Some(metrics) = &self.metrics {
            metrics.record_cost_estimate(&estimate.service_type.to_string());
        }
        estimate
    }

    /// Validate the form and create the booking on the backend.
    ///
    /// A form that fails validation never reaches the backend.
    #[instrument(skip(self, form), fields(service_type = %form.service_type, pets = form.pets.len()))]
    pub async fn submit(&self, form: &BookingForm) -> ServiceResult<Booking> {
        crate::info_with_trace!("Submitting booking");

        // Raw form input must not become a metric label
        let service_label = ServiceType::from_str_lenient(&form.service_type).to_string();

        if let Err(e) = form.validate() {
            crate::warn_with_trace!("Booking submission blocked by validation: {}", e);
            self.record("submit", &service_label, false);
            return Err(e.into());
        }

        let estimate = form.estimate();
        let request = form.to_create_request(&estimate)?;

        match self.repository.create(request).await {
            Ok(booking) => {
                crate::info_with_trace!(
                    booking_id = %booking.id,
                    total_amount = %booking.total_amount,
                    "Booking created successfully"
                );
                self.record("submit", &service_label, true);
                Ok(booking)
            }
            Err(e) => {
                crate::error_with_trace!("Backend failed to create booking: {}", e);
                self.record("submit", &service_label, false);
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list_bookings(&self) -> ServiceResult<Vec<Booking>> {
        crate::info_with_trace!("Listing bookings");

        let bookings = self.repository.find_all().await?;

        crate::info_with_trace!("Found {} bookings", bookings.len());
        Ok(bookings)
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_booking(&self, id: &str) -> ServiceResult<Booking> {
        validate_id("booking_id", id)?;

        match self.repository.find_by_id(id).await? {
            Some(booking) => Ok(booking),
            None => {
                crate::warn_with_trace!("Booking not found");
                Err(ServiceError::BookingNotFound { id: id.to_string() })
            }
        }
    }

    /// Assign a sitter, change status or edit notes
    #[instrument(skip(self, request), fields(id = %id))]
    pub async fn update_booking(
        &self,
        id: &str,
        request: UpdateBookingRequest,
    ) -> ServiceResult<Booking> {
        crate::info_with_trace!("Updating booking");

        validate_id("booking_id", id)?;
        request.validate()?;

        let result = self
            .repository
            .update(id, request)
            .await
            .map_err(|e| not_found_as_booking(e, id));

        if let Ok(booking) = &result {
            self.record("update", &booking.service_type.to_string(), true);
        }
        result
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn cancel_booking(&self, id: &str) -> ServiceResult<Booking> {
        crate::info_with_trace!("Cancelling booking");

        let request = UpdateBookingRequest {
            status: Some(BookingStatus::Cancelled),
            ..Default::default()
        };
        self.update_booking(id, request).await
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_booking(&self, id: &str) -> ServiceResult<()> {
        crate::info_with_trace!("Deleting booking");

        validate_id("booking_id", id)?;
        self.repository
            .delete(id)
            .await
            .map_err(|e| not_found_as_booking(e, id))?;

        crate::info_with_trace!("Booking deleted successfully");
        Ok(())
    }

    fn record(&self, operation: &str, service_type: &str, success: bool) {
        if let Some(metrics) = &self.metrics {
            metrics.record_booking_operation(operation, service_type, success);
        }
    }
}

fn not_found_as_booking(err: BackendError, id: &str) -> ServiceError {
    match err {
        BackendError::NotFound => ServiceError::BookingNotFound { id: id.to_string() },
        other => other.into(),
    }
}
