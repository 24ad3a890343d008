use serde::{Deserialize, Serialize};
use std::fmt;

/// Error document returned by Lago for rejected requests
///
/// ```json
/// {"status": 422, "error": "Unprocessable Entity", "code": "validation_errors",
///  "error_details": {"plan_code": ["plan_not_found"]}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error_details: Option<serde_json::Value>,
}

impl ApiError {
    /// Parse a Lago error body, falling back to the raw text when it is not a
    /// Lago error document.
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiError>(body) {
            Ok(mut parsed) => {
                parsed.status = status;
                parsed
            }
            Err(_) => Self {
                status,
                error: body.to_string(),
                code: None,
                error_details: None,
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.error)?;
        if let Some(code) = &self.code {
            write!(f, " ({})", code)?;
        }
        if let Some(details) = &self.error_details {
            write!(f, ": {}", details)?;
        }
        Ok(())
    }
}

/// Errors that can occur during Lago API communication
#[derive(Debug)]
pub enum ConnectorError {
    /// HTTP request/response error
    HttpError(String),
    /// Service unreachable, timeout or 5xx
    ServiceUnavailable(String),
    /// Invalid response format from Lago
    InvalidResponse(String),
    /// Authentication error (401/403)
    Unauthorized(String),
    /// Not found (404)
    NotFound(String),
    /// Rate limited (429)
    RateLimited(String),
    /// Request rejected by Lago validation (422)
    Validation(ApiError),
    /// Internal error in connector
    Internal(String),
}

impl ConnectorError {
    /// Map a non-success HTTP status and its body to a connector error
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        use reqwest::StatusCode;

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Self::Unauthorized(format!("Lago error {}: {}", status, body))
            }
            StatusCode::NOT_FOUND => Self::NotFound(format!("Lago error {}: {}", status, body)),
            StatusCode::UNPROCESSABLE_ENTITY => {
                Self::Validation(ApiError::from_body(status.as_u16(), &body))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                Self::RateLimited(format!("Lago error {}: {}", status, body))
            }
            status if status.is_server_error() => {
                Self::ServiceUnavailable(format!("Lago error {}: {}", status, body))
            }
            status => Self::HttpError(format!("Lago error {}: {}", status, body)),
        }
    }
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            Self::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            Self::Validation(err) => write!(f, "Validation failed: {}", err),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ConnectorError {}

impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::ServiceUnavailable(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            Self::ServiceUnavailable(format!("Connection failed: {}", err))
        } else {
            Self::HttpError(err.to_string())
        }
    }
}
