use axum::extract::FromRequest;

use crate::errors::AppError;

/// `Json` extractor whose rejections render as `AppError::Validation` (400).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
