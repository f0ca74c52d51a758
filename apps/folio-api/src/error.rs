//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Folio                                  │
//! │                                                                         │
//! │  Handler: Result<Json<T>, ApiError>                                    │
//! │         │                                                               │
//! │         ├── ValidationError ───────────────► 422 VALIDATION_ERROR       │
//! │         ├── CoreError::InvalidInvoiceStatus ► 409 CONFLICT              │
//! │         ├── CoreError::PaymentExceedsBalance ► 422 PAYMENT_ERROR        │
//! │         ├── DbError::NotFound ─────────────► 404 NOT_FOUND              │
//! │         ├── DbError::Conflict ─────────────► 409 CONFLICT               │
//! │         └── DbError::QueryFailed ──────────► 500 DATABASE_ERROR         │
//! │                                                                         │
//! │  Body: { "code": "NOT_FOUND", "message": "Invoice not found: ..." }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Database details are logged, never returned to the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use folio_core::{CoreError, ValidationError};
use folio_db::DbError;

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error body returned by every failing endpoint.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Invoice not found: 4f7c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Malformed request, e.g. an unknown status filter (400)
    BadRequest,

    /// Input validation failed (422)
    ValidationError,

    /// Operation not allowed in the invoice's current state (409)
    Conflict,

    /// Payment rejected against the invoice balance (422)
    PaymentError,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::ValidationError | ErrorCode::PaymentError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::Conflict { entity, id } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} {} was changed by another request, reload and retry", entity, id),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::InvalidData { column, value } => {
                tracing::error!(%column, %value, "Stored data could not be decoded");
                ApiError::new(ErrorCode::DatabaseError, "Stored data is corrupt")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::InvoiceNotFound(id) => ApiError::not_found("Invoice", &id),
            CoreError::ClientNotFound(id) => ApiError::not_found("Client", &id),
            CoreError::InvalidInvoiceStatus { .. } => {
                ApiError::new(ErrorCode::Conflict, message)
            }
            CoreError::PaymentExceedsBalance { .. } | CoreError::InvalidPaymentAmount { .. } => {
                ApiError::new(ErrorCode::PaymentError, message)
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{InvoiceStatus, Money};

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ValidationError.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorCode::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::DatabaseError.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_core_errors() {
        let err: ApiError = CoreError::InvalidInvoiceStatus {
            invoice_id: "abc".to_string(),
            current_status: InvoiceStatus::Paid,
            operation: "cancel",
        }
        .into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "Invoice abc is paid, cannot cancel");

        let err: ApiError = CoreError::PaymentExceedsBalance {
            balance: Money::from_cents(1000),
            requested: Money::from_cents(1500),
        }
        .into();
        assert_eq!(err.code, ErrorCode::PaymentError);

        let err: ApiError = CoreError::ClientNotFound("c1".to_string()).into();
        assert_eq!(err.message, "Client not found: c1");
    }

    #[test]
    fn test_db_errors_hide_details() {
        let err: ApiError = DbError::QueryFailed("syntax error near SELEC".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("SELEC"));

        let err: ApiError = DbError::not_found("Invoice", "x").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = DbError::conflict("Invoice", "x").into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::validation("bad")).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "bad");
    }
}
