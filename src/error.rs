use crate::host::HostError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;

/// The only error shape a client ever sees.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error:      String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username:   Option<String>,
}

impl ErrorBody {
    pub fn new(message: &str) -> Self {
        Self { error: message.to_string(), username: None }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("player '{0}' not found or stats unavailable")]
    PlayerNotFound(String),

    #[error("endpoint not found")]
    EndpointNotFound,

    /// Detail is logged, never returned
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Internal(format!("serialization failed: {}", e))
    }
}

impl From<HostError> for ApiError {
    fn from(e: HostError) -> Self {
        ApiError::Internal(format!("host fault: {}", e))
    }
}

impl From<prometheus::Error> for ApiError {
    fn from(e: prometheus::Error) -> Self {
        ApiError::Internal(format!("metrics encoding failed: {}", e))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::PlayerNotFound(_) | ApiError::EndpointNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::PlayerNotFound(username) => ErrorBody {
                error: "Player not found or stats unavailable".to_string(),
                username: Some(username.clone()),
            },
            ApiError::EndpointNotFound => ErrorBody::new("Endpoint not found"),
            ApiError::Internal(detail) => {
                error!("API Error: {}", detail);
                ErrorBody::new("Internal server error")
            }
        };

        HttpResponse::build(self.status_code()).json(&body)
    }
}
