//! API error type and axum `IntoResponse` implementation.
//!
//! Status mapping: `Unauthorized` and `InvalidToken` → 401 (only the former
//! advertises the Basic realm), `Forbidden` → 403, `NotFound` → 404,
//! `BadRequest` → 400, `InvalidState` and `Store` → 500.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use ripple_access::AccessError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing or wrong operator credentials on the owner surface.
  #[error("unauthorized")]
  Unauthorized,

  /// Missing, malformed, expired, or tampered bearer token on the share
  /// surface.
  #[error("invalid token")]
  InvalidToken,

  #[error("forbidden")]
  Forbidden,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("invalid state: {0}")]
  InvalidState(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend error at the `ShareStore` seam.
  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Self::Store(Box::new(e))
  }
}

impl From<AccessError> for ApiError {
  fn from(e: AccessError) -> Self {
    match e {
      AccessError::PostNotFound(_)
      | AccessError::SubjectNotFound(_)
      | AccessError::MediaNotFound(_) => Self::NotFound(e.to_string()),
      AccessError::Unauthorized => Self::InvalidToken,
      AccessError::Forbidden => Self::Forbidden,
      AccessError::InvalidState(msg) => Self::InvalidState(msg),
      AccessError::Store(inner) => Self::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
      ApiError::InvalidToken => (StatusCode::UNAUTHORIZED, self.to_string()),
      ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::InvalidState(m) => {
        (StatusCode::INTERNAL_SERVER_ERROR, m.clone())
      }
      ApiError::Store(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };

    let advertise_realm = matches!(self, ApiError::Unauthorized);
    let mut res =
      (status, Json(json!({ "error": message }))).into_response();
    if advertise_realm {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"ripple\""),
      );
    }
    res
  }
}
