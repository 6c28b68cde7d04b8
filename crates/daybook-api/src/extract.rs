//! Extractors whose rejections are reported as [`ApiError::BadRequest`], so
//! malformed input gets the same `{"error": ..}` body as every other failure.

use axum::extract::{
  FromRequest, FromRequestParts,
  rejection::{JsonRejection, PathRejection, QueryRejection},
};

use crate::error::ApiError;

/// [`axum::Json`] with a JSON 400 on rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// [`axum::extract::Path`] with a JSON 400 on rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// [`axum::extract::Query`] with a JSON 400 on rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

fn rejected(what: &str, message: String) -> ApiError {
  tracing::warn!(error = %message, "rejected {what}");
  ApiError::BadRequest(message)
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { rejected("body", r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { rejected("path", r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { rejected("query", r.body_text()) }
}
