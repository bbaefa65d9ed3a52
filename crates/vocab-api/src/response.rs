//! The JSON envelope every endpoint except `/health` responds with, and
//! extractors that reject into it.

use axum::{
  extract::{FromRequest, FromRequestParts},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// `{ "code": 200, "message": "...", "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub code:    u16,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
}

impl<T> Envelope<T> {
  pub fn ok(data: T) -> Self {
    Self { code: 200, message: None, data: Some(data) }
  }

  pub fn with_message(mut self, message: impl Into<String>) -> Self {
    self.message = Some(message.into());
    self
  }
}

impl Envelope<()> {
  /// A success with a message and no data.
  pub fn done(message: impl Into<String>) -> Self {
    Self { code: 200, message: Some(message.into()), data: None }
  }

  pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
    Self {
      code:    status.as_u16(),
      message: Some(message.into()),
      data:    None,
    }
  }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
  fn into_response(self) -> Response { axum::Json(self).into_response() }
}

/// [`axum::Json`] with rejections rendered as an [`Envelope`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

/// [`axum::extract::Query`] with rejections rendered as an [`Envelope`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

/// [`axum::extract::Path`] with rejections rendered as an [`Envelope`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);
