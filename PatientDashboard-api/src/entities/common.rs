use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a not found error response
    pub fn not_found(message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "not_found".to_string(),
            message: message.into(),
            details,
        }
    }

    /// The stored collection is empty
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self {
            error: "insufficient_data".to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.into(),
            details,
        }
    }

    /// The request body exceeded the upload limit
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self {
            error: "payload_too_large".to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }

    /// HTTP status for this error code
    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" | "insufficient_data" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "payload_too_large" => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Plain message body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_map_to_status() {
        assert_eq!(ErrorResponse::not_found("x", None).status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorResponse::insufficient_data("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorResponse::bad_request("x", None).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorResponse::payload_too_large("x").status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ErrorResponse::internal_error().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_details_skipped_when_absent() {
        let json = serde_json::to_value(ErrorResponse::bad_request("No file uploaded", None)).unwrap();
        assert!(json.get("details").is_none());
        assert_eq!(json["error"], "bad_request");
    }
}
