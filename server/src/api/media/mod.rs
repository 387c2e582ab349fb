pub mod get;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Stored recipe images (/api/media/{id})
pub fn router() -> Router<AppState> {
    Router::new().route("/api/media/{id}", get(get::get_image))
}

#[derive(OpenApi)]
#[openapi(paths(get::get_image))]
pub struct ApiDoc;
