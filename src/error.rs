// Error handling module for the booking API
// Provides the HTTP error type and its JSON response format

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use utoipa::ToSchema;

use crate::bookings::BookingError;
use crate::rooms::RoomError;
use crate::store::StoreError;

/// Main error type for the API
/// All handlers should return Result<T, ApiError>
///
/// Each variant maps to a specific HTTP status code and error response format.
#[derive(Debug)]
pub enum ApiError {
    /// Validation errors from request validation
    /// Maps to HTTP 400 Bad Request
    ValidationError(validator::ValidationErrors),

    /// Well-formed request that breaks a domain rule
    /// Maps to HTTP 400 Bad Request
    BadRequest {
        error_code: &'static str,
        message: String,
    },

    /// Resource not found by ID
    /// Maps to HTTP 404 Not Found
    NotFound { resource: String, id: String },

    /// Overlapping stay or other state conflict
    /// Maps to HTTP 409 Conflict
    Conflict { message: String },

    /// Store unreachable or too slow; the same request may be retried
    /// Maps to HTTP 503 Service Unavailable
    Unavailable {
        error_code: &'static str,
        internal: String,
    },

    /// A write failed after all checks passed; nothing was saved
    /// Maps to HTTP 500 Internal Server Error
    PersistenceError(String),

    /// Database operation errors
    /// Maps to HTTP 500 Internal Server Error
    /// Sensitive details are filtered from client responses
    DatabaseError(sqlx::Error),

    /// Internal server errors
    /// Maps to HTTP 500 Internal Server Error
    /// Sensitive details are filtered from client responses
    InternalError(String),
}

/// Consistent error response structure
///
/// Carries both a machine-readable `error_code` and a human-readable message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "NOT_FOUND")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (field errors, `retryable` flag)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,

    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message: message.into(),
            details,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

fn retryable() -> Option<serde_json::Value> {
    Some(serde_json::json!({ "retryable": true }))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logging level follows severity: `error!` for 5xx, `warn!` for conflicts
    /// and `debug!` for expected client errors. Internal details never reach
    /// the response body.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        let response = match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                ErrorResponse::new(
                    "VALIDATION_ERROR",
                    "Request validation failed",
                    Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({}))),
                )
            }
            ApiError::BadRequest {
                error_code,
                message,
            } => {
                debug!("Bad request ({}): {}", error_code, message);
                ErrorResponse::new(error_code, message.clone(), None)
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                ErrorResponse::new("NOT_FOUND", format!("{} with id {} not found", resource, id), None)
            }
            ApiError::Conflict { message } => {
                warn!("Conflict error: {}", message);
                ErrorResponse::new("CONFLICT", message.clone(), None)
            }
            ApiError::Unavailable {
                error_code,
                internal,
            } => {
                error!("Service unavailable ({}): {}", error_code, internal);
                ErrorResponse::new(
                    error_code,
                    "The booking service is temporarily unavailable, please try again",
                    retryable(),
                )
            }
            ApiError::PersistenceError(internal) => {
                error!("Persistence error: {}", internal);
                ErrorResponse::new(
                    "PERSISTENCE_ERROR",
                    "Your booking could not be saved, please try again",
                    retryable(),
                )
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);
                ErrorResponse::new("DATABASE_ERROR", "A database error occurred", None)
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred", None)
            }
        };
        (status, response)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::PersistenceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert sqlx errors to ApiError
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::DatabaseError(error)
    }
}

/// Convert validator errors to ApiError
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Database(db_error) => ApiError::DatabaseError(db_error),
            StoreError::NotFound { resource, id } => ApiError::NotFound {
                resource: resource.to_string(),
                id,
            },
            StoreError::Conflict(message) => ApiError::Conflict { message },
            StoreError::Backend(message) => ApiError::InternalError(message),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(error: BookingError) -> Self {
        match error {
            err @ BookingError::InvalidRange { .. } => ApiError::BadRequest {
                error_code: "INVALID_RANGE",
                message: err.to_string(),
            },
            err @ BookingError::RangeTooLong { .. } => ApiError::BadRequest {
                error_code: "RANGE_TOO_LONG",
                message: err.to_string(),
            },
            err @ BookingError::PriceOutOfRange { .. } => ApiError::BadRequest {
                error_code: "PRICE_OUT_OF_RANGE",
                message: err.to_string(),
            },
            err @ BookingError::InvalidTransition(_) => ApiError::BadRequest {
                error_code: "INVALID_TRANSITION",
                message: err.to_string(),
            },
            BookingError::UnknownRoomType(id) => ApiError::NotFound {
                resource: "RoomType".to_string(),
                id: id.to_string(),
            },
            BookingError::BookingNotFound(id) => ApiError::NotFound {
                resource: "Booking".to_string(),
                id: id.to_string(),
            },
            BookingError::AvailabilityCheckFailed(internal) => ApiError::Unavailable {
                error_code: "AVAILABILITY_CHECK_FAILED",
                internal,
            },
            err @ BookingError::Timeout { .. } => ApiError::Unavailable {
                error_code: "STORE_TIMEOUT",
                internal: err.to_string(),
            },
            BookingError::Persistence(internal) => ApiError::PersistenceError(internal),
            BookingError::Conflict(message) => ApiError::Conflict { message },
            BookingError::Validation(errors) => ApiError::ValidationError(errors),
            BookingError::Store(store_error) => store_error.into(),
        }
    }
}

impl From<RoomError> for ApiError {
    fn from(error: RoomError) -> Self {
        match error {
            RoomError::NotFound(id) => ApiError::NotFound {
                resource: "RoomType".to_string(),
                id: id.to_string(),
            },
            RoomError::OverrideNotFound { room_type_id, date } => ApiError::NotFound {
                resource: "DatePriceOverride".to_string(),
                id: format!("{}/{}", room_type_id, date),
            },
            RoomError::Validation(errors) => ApiError::ValidationError(errors),
            err @ RoomError::InvalidRange { .. } => ApiError::BadRequest {
                error_code: "INVALID_RANGE",
                message: err.to_string(),
            },
            RoomError::Conflict(message) => ApiError::Conflict { message },
            RoomError::Store(store_error) => store_error.into(),
        }
    }
}
