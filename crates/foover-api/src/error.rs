//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Client faults map to `400`/`404`; everything else is a server fault.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use foover_service::ServiceError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  NotFound(String),

  #[error(transparent)]
  Service(#[from] ServiceError),
}

impl ApiError {
  pub fn invalid_payload() -> Self { Self::BadRequest("Invalid request payload".into()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Service(e) => match e {
        ServiceError::InvalidSession(_) => {
          (StatusCode::BAD_REQUEST, "Invalid session ID".to_owned())
        }
        ServiceError::InvalidProduct(_) => {
          (StatusCode::BAD_REQUEST, "Invalid product ID".to_owned())
        }
        ServiceError::InvalidScore(_) | ServiceError::Validation(_) => {
          (StatusCode::BAD_REQUEST, e.to_string())
        }
        ServiceError::Timeout(_) => {
          tracing::error!(error = %e, "request timed out");
          (StatusCode::GATEWAY_TIMEOUT, "Request timed out".to_owned())
        }
        ServiceError::Storage(_) | ServiceError::Fetch(_) | ServiceError::Decode(_) => {
          tracing::error!(error = %e, "request failed");
          (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_owned())
        }
      },
    };
    (status, Json(json!({ "message": message }))).into_response()
  }
}
