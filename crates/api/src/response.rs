//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hosteldesk_core::invalidation::{self, ReadModel};
use serde::Serialize;

/// Response header naming the read models a mutation invalidated.
pub const INVALIDATES_HEADER: &str = "x-invalidates";

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub const fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(code: impl Into<String>, message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = if self.error.is_some() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        };
        (status, Json(self)).into_response()
    }
}

/// Attach the invalidation contract header to a mutation response.
pub fn invalidates<R: IntoResponse>(models: &[ReadModel], response: R) -> Response {
    (
        [(INVALIDATES_HEADER, invalidation::header_value(models))],
        response,
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_response_serializes_data_only() {
        let response = ApiResponse::ok(serde_json::json!({"id": "i1"}));
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"data\""));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_err_response_serializes_code() {
        let response = ApiResponse::<()>::err("CONFLICT", "Already claimed");
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"code\":\"CONFLICT\""));
        assert!(!json.contains("\"data\""));
    }
}
