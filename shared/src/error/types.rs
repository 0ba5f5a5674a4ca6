//! Application error and the JSON error body returned by the API

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error carrying a stable [`ErrorCode`]
///
/// `details` holds structured context (the offending id, field, time...)
/// and is passed through to the client unchanged.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the default message of `code`
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Broken business rule that has no dedicated code
    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Domain specific "not found" carrying the missing id
    pub fn not_found_with(code: ErrorCode, id: impl Into<Value>) -> Self {
        Self::new(code).with_detail("id", id)
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Unified login failure (unknown email or wrong password)
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }
}

/// JSON body of every error response
///
/// ```json
/// { "code": 3002, "message": "Requested time slot is not available", "details": { "time": "10:30" } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();
        let body = ErrorBody::from(&self);

        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_message_comes_from_code() {
        let err = AppError::new(ErrorCode::SlotUnavailable);
        assert_eq!(err.code, ErrorCode::SlotUnavailable);
        assert_eq!(err.message, "Requested time slot is not available");
        assert!(err.details.is_none());
        assert_eq!(err.to_string(), err.message);
    }

    #[test]
    fn details_accumulate() {
        let err = AppError::validation("Invalid weekly schedule")
            .with_detail("day", "monday")
            .with_detail("reason", "end before start");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("day").unwrap(), "monday");
        assert_eq!(details.get("reason").unwrap(), "end before start");
    }

    #[test]
    fn status_follows_code() {
        assert_eq!(
            AppError::not_found_with(ErrorCode::ServiceNotFound, 42).http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::unauthorized().http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::permission_denied("Admin only").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::new(ErrorCode::ServiceInUse).http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn not_found_with_carries_id() {
        let err = AppError::not_found_with(ErrorCode::ServiceNotFound, 42);
        assert_eq!(err.message, "Service not found");
        assert_eq!(err.details.unwrap().get("id").unwrap(), 42);
    }

    #[test]
    fn body_serializes_numeric_code() {
        let err = AppError::new(ErrorCode::InsufficientStock).with_detail("stock", 2);
        let json = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(json["code"], 4102);
        assert_eq!(json["message"], "Insufficient stock");
        assert_eq!(json["details"]["stock"], 2);

        let plain = serde_json::to_value(ErrorBody::from(&AppError::internal("boom"))).unwrap();
        assert!(plain.get("details").is_none());
    }
}
