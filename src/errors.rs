use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// Errors produced by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::error::DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::ValidationError(_) | ServiceError::InvalidStatus(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::InvalidOperation(_) => StatusCode::CONFLICT,
            ServiceError::DatabaseError(_)
            | ServiceError::EventError(_)
            | ServiceError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to API clients. Database failures are collapsed so
    /// connection strings and SQL never leak into responses.
    pub fn response_message(&self) -> String {
        match self {
            ServiceError::DatabaseError(_) => "A database error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        (status, Json(err)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            ServiceError::NotFound("order".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn database_errors_do_not_leak_details() {
        let err = ServiceError::DatabaseError(sea_orm::DbErr::Custom(
            "secret connection detail".into(),
        ));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.response_message().contains("secret"));
    }

    #[test]
    fn invalid_status_is_a_client_error() {
        assert_eq!(
            ServiceError::InvalidStatus("fulfilled is terminal".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
