mod access;
pub mod create;
pub mod delete;
pub mod download_shopping_cart;
pub mod favorite;
pub mod get;
pub mod list;
mod marks;
pub mod payload;
mod persist;
pub mod representation;
pub mod shopping_cart;
pub mod update;

use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use foodgram_core::MAX_FILE_SIZE;
use utoipa::OpenApi;

/// Base64 inflates an image by a third; leave room for the other fields.
const MAX_BODY_SIZE: usize = MAX_FILE_SIZE / 3 * 4 + 64 * 1024;

/// Recipe endpoints, including favorites, the cart and the shopping list
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recipes/",
            get(list::list_recipes).post(create::create_recipe),
        )
        .route(
            "/api/recipes/download_shopping_cart/",
            get(download_shopping_cart::download_shopping_cart),
        )
        .route(
            "/api/recipes/{id}/",
            get(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route(
            "/api/recipes/{id}/favorite/",
            post(favorite::add_favorite).delete(favorite::remove_favorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart/",
            post(shopping_cart::add_to_shopping_cart)
                .delete(shopping_cart::remove_from_shopping_cart),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        get::get_recipe,
        create::create_recipe,
        update::update_recipe,
        delete::delete_recipe,
        favorite::add_favorite,
        favorite::remove_favorite,
        shopping_cart::add_to_shopping_cart,
        shopping_cart::remove_from_shopping_cart,
        download_shopping_cart::download_shopping_cart,
    ),
    components(schemas(
        payload::RecipeRequest,
        payload::IngredientAmountRequest,
        representation::RecipeResponse,
        representation::RecipeIngredientResponse,
        representation::RecipeMinified,
    ))
)]
pub struct ApiDoc;
