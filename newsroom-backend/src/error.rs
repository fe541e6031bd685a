//! Error taxonomy for the public API.
//!
//! Every variant renders as `{"error": "..."}`. Upstream and storage causes are
//! logged where they happen and never echoed back to the caller.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::store::StoreError;

#[derive(Debug, Clone)]
pub enum ApiError {
    /// Missing server-side configuration, such as the upstream credential.
    Config(String),
    /// Request is missing required fields.
    Validation(String),
    /// The news provider failed or was unreachable. Holds the logged cause.
    Upstream(String),
    /// Caller exceeded the fixed-window request budget.
    RateLimited,
    /// A durable write failed and the in-memory change was rolled back.
    Storage(StoreError),
}

impl ApiError {
    /// Message returned to the client.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Config(msg) | ApiError::Validation(msg) => msg.clone(),
            ApiError::Upstream(_) => "Failed to fetch news".to_string(),
            ApiError::RateLimited => "Too many requests".to_string(),
            ApiError::Storage(_) => "Failed to save changes".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "configuration error: {}", msg),
            ApiError::Validation(msg) => write!(f, "validation error: {}", msg),
            ApiError::Upstream(cause) => write!(f, "upstream failure: {}", cause),
            ApiError::RateLimited => write!(f, "rate limit exceeded"),
            ApiError::Storage(e) => write!(f, "storage error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Storage(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Config(_) | ApiError::Upstream(_) | ApiError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.public_message()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_cause_is_not_exposed() {
        let err = ApiError::Upstream("connection refused: 10.0.0.1:443".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Failed to fetch news");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("articleId and text required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            ApiError::Config("NEWSAPI_KEY not configured".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
