pub mod create;
pub mod get;
pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Ingredient endpoints (/api/ingredients/)
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/ingredients/",
            get(list::list_ingredients).post(create::create_ingredient),
        )
        .route("/api/ingredients/{id}/", get(get::get_ingredient))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_ingredients, get::get_ingredient, create::create_ingredient),
    components(schemas(crate::models::Ingredient, create::CreateIngredientRequest))
)]
pub struct ApiDoc;
