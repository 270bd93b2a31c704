use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn, Instrument};

use crate::models::{
    BackendError, BackendResult, Booking, CreateBookingRequest, UpdateBookingRequest,
};
use crate::observability::Metrics;

/// Message used when the backend rejects a request without explaining why
pub const FALLBACK_REJECTION_MESSAGE: &str = "Failed to process booking request";

/// Trait defining the interface for booking persistence
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Create a new booking
    async fn create(&self, request: CreateBookingRequest) -> BackendResult<Booking>;

    /// List bookings visible to the caller
    async fn find_all(&self) -> BackendResult<Vec<Booking>>;

    /// Find a booking by its ID
    async fn find_by_id(&self, id: &str) -> BackendResult<Option<Booking>>;

    /// Apply a partial update to a booking
    async fn update(&self, id: &str, request: UpdateBookingRequest) -> BackendResult<Booking>;

    /// Delete a booking
    async fn delete(&self, id: &str) -> BackendResult<()>;
}

/// Backends answer either with the bare resource or wrapped in an envelope
#[derive(Deserialize)]
#[serde(untagged)]
enum BookingEnvelope {
    Wrapped { booking: Booking },
    Plain(Booking),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BookingListEnvelope {
    Wrapped { bookings: Vec<Booking> },
    Plain(Vec<Booking>),
}

impl From<BookingEnvelope> for Booking {
    fn from(envelope: BookingEnvelope) -> Self {
        match envelope {
            BookingEnvelope::Wrapped { booking } => booking,
            BookingEnvelope::Plain(booking) => booking,
        }
    }
}

impl From<BookingListEnvelope> for Vec<Booking> {
    fn from(envelope: BookingListEnvelope) -> Self {
        match envelope {
            BookingListEnvelope::Wrapped { bookings } => bookings,
            BookingListEnvelope::Plain(bookings) => bookings,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// REST implementation of the BookingRepository trait
pub struct HttpBookingRepository {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    metrics: Option<Arc<Metrics>>,
}

impl HttpBookingRepository {
    /// Create a new repository talking to the backend at `base_url`
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        api_token: Option<String>,
    ) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::ConnectionFailed {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
            metrics: None,
        })
    }

    /// Record backend request metrics
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request, mapping transport failures and non-success statuses
    async fn send(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> BackendResult<Response> {
        let span = tracing::info_span!(
            "backend_request",
            "otel.kind" = "client",
            "otel.name" = %format!("Backend.{}", operation),
            "backend.operation" = operation,
            "http.method" = %method,
            "http.url" = %self.url(path),
            "http.status_code" = tracing::field::Empty,
        );

        let start_time = Instant::now();

        let result = async {
            let response = builder.send().await.map_err(map_transport_error)?;
            let status = response.status();
            tracing::Span::current().record("http.status_code", status.as_u16());

            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            Err(map_error_status(status, &body))
        }
        .instrument(span)
        .await;

        let duration = start_time.elapsed();
        if let Some(metrics) = &self.metrics {
            metrics.record_backend_request(operation, result.is_ok(), duration.as_secs_f64());
        }

        match &result {
            Ok(_) => info!(
                operation = operation,
                duration_ms = duration.as_millis(),
                "Backend request completed successfully"
            ),
            Err(BackendError::NotFound) => warn!(
                operation = operation,
                duration_ms = duration.as_millis(),
                "Backend resource not found"
            ),
            Err(e) => error!(
                operation = operation,
                error = %e,
                duration_ms = duration.as_millis(),
                "Backend request failed"
            ),
        }

        result
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| BackendError::InvalidResponse {
            message: e.to_string(),
        })?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn map_transport_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else if err.is_connect() {
        BackendError::ConnectionFailed {
            message: err.to_string(),
        }
    } else {
        BackendError::InvalidResponse {
            message: err.to_string(),
        }
    }
}

/// Map a non-success backend status and body to a BackendError
pub fn map_error_status(status: StatusCode, body: &str) -> BackendError {
    match status {
        StatusCode::NOT_FOUND => BackendError::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized {
            status: status.as_u16(),
        },
        _ => {
            let message = serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.message.or(b.error))
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_REJECTION_MESSAGE.to_string());

            BackendError::Rejected {
                status: status.as_u16(),
                message,
            }
        }
    }
}

#[async_trait]
impl BookingRepository for HttpBookingRepository {
    #[instrument(skip(self, request), fields(service_type = %request.service_type))]
    async fn create(&self, request: CreateBookingRequest) -> BackendResult<Booking> {
        let builder = self.request(Method::POST, "bookings").json(&request);
        let response = self
            .send("create_booking", Method::POST, "bookings", builder)
            .await?;
        let envelope: BookingEnvelope = decode(response).await?;
        Ok(envelope.into())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> BackendResult<Vec<Booking>> {
        let builder = self.request(Method::GET, "bookings");
        let response = self
            .send("list_bookings", Method::GET, "bookings", builder)
            .await?;
        let envelope: BookingListEnvelope = decode(response).await?;
        Ok(envelope.into())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn find_by_id(&self, id: &str) -> BackendResult<Option<Booking>> {
        let path = format!("bookings/{}", id);
        let builder = self.request(Method::GET, &path);
        match self.send("find_booking", Method::GET, &path, builder).await {
            Ok(response) => {
                let envelope: BookingEnvelope = decode(response).await?;
                Ok(Some(envelope.into()))
            }
            Err(BackendError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update(&self, id: &str, request: UpdateBookingRequest) -> BackendResult<Booking> {
        let path = format!("bookings/{}", id);
        let builder = self.request(Method::PUT, &path).json(&request);
        let response = self
            .send("update_booking", Method::PUT, &path, builder)
            .await?;
        let envelope: BookingEnvelope = decode(response).await?;
        Ok(envelope.into())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &str) -> BackendResult<()> {
        let path = format!("bookings/{}", id);
        let builder = self.request(Method::DELETE, &path);
        self.send("delete_booking", Method::DELETE, &path, builder)
            .await?;
        Ok(())
    }
}
