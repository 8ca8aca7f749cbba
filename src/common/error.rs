// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use super::validation::ValidationResult;
use crate::services::google::GoogleError;
use crate::services::otp::OtpError;

/// API error types
///
/// Every failure surfaced to a client maps to exactly one of these variants.
/// The `IntoResponse` impl below is the single place where errors become
/// HTTP responses, so the status-code and envelope mapping stays exhaustive.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    MissingCode,
    TokenExchange(String),
    ProfileFetch(String),
    InvalidOtp,
    Unauthorized(String),
    NotFound(String),
    DatabaseError(sqlx::Error),
    InternalServer(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            ApiError::MissingCode => write!(f, "Missing Code: authorization code is required"),
            ApiError::TokenExchange(msg) => write!(f, "Token Exchange Error: {}", msg),
            ApiError::ProfileFetch(msg) => write!(f, "Profile Fetch Error: {}", msg),
            ApiError::InvalidOtp => write!(f, "Invalid OTP: invalid or expired OTP code"),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// JSON error envelope: `{success:false, error:<kind>, message?}`
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, kind, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "ValidationError", Some(msg)),
            ApiError::MissingCode => (
                StatusCode::BAD_REQUEST,
                "MissingCodeError",
                Some("Authorization code is required".to_string()),
            ),
            ApiError::TokenExchange(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TokenExchangeError",
                Some(msg),
            ),
            ApiError::ProfileFetch(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ProfileFetchError",
                Some(msg),
            ),
            ApiError::InvalidOtp => (
                StatusCode::BAD_REQUEST,
                "InvalidOtpError",
                Some("Invalid or expired OTP code".to_string()),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UnauthorizedError", Some(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NotFoundError", Some(msg)),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DatabaseError",
                    Some("Database operation failed".to_string()),
                )
            }
            ApiError::InternalServer(msg) => {
                error!(message = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    Some(msg),
                )
            }
        };

        let error_response = ErrorResponse {
            success: false,
            error: kind.to_string(),
            message,
        };

        (status, Json(error_response)).into_response()
    }
}

/// Helper function to convert ValidationResult to ApiError
impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid {
            ApiError::InternalServer(
                "Validation result was valid but converted to error".to_string(),
            )
        } else {
            let error_messages: Vec<String> = result
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            ApiError::Validation(error_messages.join(", "))
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::DatabaseError(e)
    }
}

impl From<OtpError> for ApiError {
    fn from(e: OtpError) -> Self {
        match e {
            OtpError::InvalidEmail => ApiError::Validation("Invalid email address".to_string()),
            OtpError::InvalidCode => ApiError::InvalidOtp,
            OtpError::Database(e) => ApiError::DatabaseError(e),
            OtpError::Delivery(e) => ApiError::InternalServer(e.to_string()),
        }
    }
}

impl From<GoogleError> for ApiError {
    fn from(e: GoogleError) -> Self {
        match e {
            GoogleError::TokenExchange(detail) => ApiError::TokenExchange(detail),
            GoogleError::ProfileFetch(detail) => ApiError::ProfileFetch(detail),
        }
    }
}
