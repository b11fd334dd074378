// Common response envelope and error type for the public API
//
// Every endpoint wraps its payload in ApiResponse and every failure is
// an ApiError rendered through the same ErrorResponse envelope, so
// clients can branch on `success` without inspecting status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Success envelope wrapping every endpoint payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.is_success(),
        }
    }
}

/// 200 envelope
pub fn ok<T>(data: T, message: &str) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::new(StatusCode::OK, data, message)),
    )
}

/// 201 envelope
pub fn created<T>(data: T, message: &str) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED, data, message)),
    )
}

/// API error taxonomy. Everything a handler or service can fail with
/// maps onto one of these; storage errors arrive via the Internal
/// variant and are never shown to clients verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Validation failed")]
    Validation(Vec<String>),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenient result alias for handlers and services
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error envelope, mirrors ApiResponse with `success: false` and a
/// null data field
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    /// Per-field details for validation failures, empty otherwise
    pub errors: Vec<String>,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn from_error(error: &ApiError) -> Self {
        let message = match error {
            // Storage and other internal failures stay server-side
            ApiError::Internal(_) => "Something went wrong".to_string(),
            other => other.to_string(),
        };
        let errors = match error {
            ApiError::Validation(details) => details.clone(),
            _ => Vec::new(),
        };
        Self {
            success: false,
            status_code: error.status().as_u16(),
            message,
            errors,
            data: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            tracing::error!("internal error: {:#}", err);
        }
        let body = ErrorResponse::from_error(&self);
        (self.status(), Json(body)).into_response()
    }
}
