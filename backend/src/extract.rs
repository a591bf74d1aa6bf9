//! Extractors whose rejections use the API error envelope

use crate::error::ApiError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{FromRequest, FromRequestParts};
use tracing::debug;

/// `axum::Json` that rejects with `{ "message": ... }`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path` that rejects with `{ "message": ... }`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected JSON body");
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::BadRequest("Expected a JSON request body".to_string())
            }
            _ => ApiError::BadRequest("Malformed JSON request body".to_string()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected path parameters");
        ApiError::BadRequest("Invalid ID format".to_string())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected multipart body");
        ApiError::BadRequest("Expected a multipart/form-data request body".to_string())
    }
}
