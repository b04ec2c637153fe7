//! Error responses for the hand service API.
//!
//! Every failure a handler can produce implements [`IntoErrorResponse`], which
//! fixes its status code, machine-readable code and log severity in one place.
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::{Rejection, Reply};

/// Standard error response format for all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "validation_error")
    pub error: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn into_response(self, status: StatusCode) -> Response {
        reply::with_status(reply::json(&self), status).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 4xx, logged at info
    Client,
    /// 5xx, logged at error
    Server,
    /// Stored data can no longer be trusted
    Critical,
}

/// Trait for converting errors to HTTP responses with proper logging
pub trait IntoErrorResponse {
    fn status_code(&self) -> StatusCode;

    fn error_code(&self) -> &'static str;

    fn error_message(&self) -> String;

    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    fn severity(&self) -> ErrorSeverity {
        if self.status_code().is_server_error() {
            ErrorSeverity::Server
        } else {
            ErrorSeverity::Client
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        match self.error_details() {
            Some(details) => {
                ErrorResponse::with_details(self.error_code(), self.error_message(), details)
            }
            None => ErrorResponse::new(self.error_code(), self.error_message()),
        }
    }

    /// Logs the error at its severity and renders it.
    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        let status = self.status_code();
        let severity = self.severity();
        let body = self.to_error_response();

        match severity {
            ErrorSeverity::Client => tracing::info!(
                status = status.as_u16(),
                code = %body.error,
                message = %body.message,
                "client error"
            ),
            ErrorSeverity::Server => tracing::error!(
                status = status.as_u16(),
                code = %body.error,
                message = %body.message,
                "server error"
            ),
            ErrorSeverity::Critical => tracing::error!(
                status = status.as_u16(),
                code = %body.error,
                message = %body.message,
                critical = true,
                "critical error"
            ),
        }

        body.into_response(status)
    }
}

/// Turns warp's own rejections (unknown route, bad JSON body, bad query)
/// into the same JSON error shape the handlers use.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not_found", "Resource not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, "invalid_body", e.to_string())
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, "invalid_query", e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "method_not_allowed",
            "Method not allowed".to_string(),
        )
    } else {
        tracing::error!(rejection = ?err, "unhandled rejection");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Unhandled request error".to_string(),
        )
    };
    Ok(ErrorResponse::new(code, message).into_response(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Teapot;

    impl IntoErrorResponse for Teapot {
        fn status_code(&self) -> StatusCode {
            StatusCode::IM_A_TEAPOT
        }

        fn error_code(&self) -> &'static str {
            "teapot"
        }

        fn error_message(&self) -> String {
            "short and stout".to_string()
        }
    }

    #[test]
    fn error_response_serialization() {
        let error = ErrorResponse::new("test_error", "Test error message");
        let json = serde_json::to_value(&error).expect("serialize");

        assert_eq!(json["error"], "test_error");
        assert_eq!(json["message"], "Test error message");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn error_response_with_details() {
        let details = json!({ "field": "players", "player_id": 3 });
        let error = ErrorResponse::with_details("validation_error", "Invalid input", details);
        let json = serde_json::to_value(&error).expect("serialize");

        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["details"]["field"], "players");
        assert_eq!(json["details"]["player_id"], 3);
    }

    #[test]
    fn error_response_display() {
        let error = ErrorResponse::new("not_found", "Resource not found");
        assert_eq!(error.to_string(), "not_found: Resource not found");
    }

    #[test]
    fn default_severity_follows_status() {
        assert_eq!(Teapot.severity(), ErrorSeverity::Client);
        let response = Teapot.into_http_response();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
