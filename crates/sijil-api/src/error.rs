//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use sijil_core::Error as CoreError;
use sijil_notify::{GatewayError, NotifyError};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("gateway error: {0}")]
  Gateway(String),

  #[error("store error: {0}")]
  Store(#[source] CoreError),
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match e {
      CoreError::PersonNotFound(id) => Self::NotFound(format!("person {id} not found")),
      CoreError::DuplicateListNumber(_) | CoreError::InvalidCriterion(_) => {
        Self::BadRequest(e.to_string())
      }
      other => Self::Store(other),
    }
  }
}

impl From<GatewayError> for ApiError {
  fn from(e: GatewayError) -> Self {
    match &e {
      GatewayError::BadCredentials => Self::Unauthorized(e.to_string()),
      GatewayError::InvalidDestination
      | GatewayError::UnverifiedDestination
      | GatewayError::UnverifiedAccount
      | GatewayError::InsufficientBalance
      | GatewayError::BadSenderConfig => Self::BadRequest(e.to_string()),
      GatewayError::Provider { .. } | GatewayError::Transport(_) => Self::Gateway(e.to_string()),
    }
  }
}

impl From<NotifyError> for ApiError {
  fn from(e: NotifyError) -> Self {
    match e {
      NotifyError::Phone(p) => Self::BadRequest(p.to_string()),
      NotifyError::Gateway(g) => g.into(),
      NotifyError::History(h) => h.into(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Gateway(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
