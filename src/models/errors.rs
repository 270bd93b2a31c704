use thiserror::Error;

/// Service-level errors that can occur in business logic
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Booking not found: {id}")]
    BookingNotFound { id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Backend error: {source}")]
    Backend {
        #[from]
        source: BackendError,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Errors raised while talking to the booking backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Item not found")]
    NotFound,

    #[error("Backend rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Unauthorized request to backend (status {status})")]
    Unauthorized { status: u16 },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Invalid backend response: {message}")]
    InvalidResponse { message: String },

    #[error("Timeout occurred during backend request")]
    Timeout,
}

/// Validation errors for input data
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredField { field: String },

    #[error("Invalid field value: {field}={value}, reason={reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Field too long: {field}, max_length={max_length}, actual_length={actual_length}")]
    TooLong {
        field: String,
        max_length: usize,
        actual_length: usize,
    },

    #[error("Invalid format: {field}, expected={expected}")]
    InvalidFormat { field: String, expected: String },

    #[error("Value out of range: {field}, min={min}, max={max}, value={value}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
        value: String,
    },

    #[error("End time must be after start time. For overnight services, the end time should be on the next day.")]
    InvalidTimeRange { start_time: String, end_time: String },
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::ValidationError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;
