pub mod create;
pub mod get;
pub mod list;
pub mod me;
pub mod representation;
pub mod set_password;
pub mod subscribe;
pub mod subscriptions;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// User accounts and subscriptions (/api/users/)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users/", get(list::list_users).post(create::create_user))
        .route("/api/users/me/", get(me::me))
        .route("/api/users/set_password/", post(set_password::set_password))
        .route(
            "/api/users/subscriptions/",
            get(subscriptions::list_subscriptions),
        )
        .route("/api/users/{id}/", get(get::get_user))
        .route(
            "/api/users/{id}/subscribe/",
            post(subscribe::subscribe).delete(subscribe::unsubscribe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_user,
        list::list_users,
        get::get_user,
        me::me,
        set_password::set_password,
        subscribe::subscribe,
        subscribe::unsubscribe,
        subscriptions::list_subscriptions,
    ),
    components(schemas(
        create::CreateUserRequest,
        create::CreatedUserResponse,
        set_password::SetPasswordRequest,
        representation::UserResponse,
        representation::UserWithRecipes,
    ))
)]
pub struct ApiDoc;
