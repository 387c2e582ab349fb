use super::ApiError;
use axum::extract::FromRequest;

/// `axum::Json` whose rejection renders as a field error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
