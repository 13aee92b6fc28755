//! Crate-local request extractors.

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body extractor whose rejection is an [`AppError`], so malformed
/// or mistyped bodies produce `400 {"error": ...}` like every other
/// client-caused failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
