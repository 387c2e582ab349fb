use crate::api::{ApiError, DetailResponse, JsonBody, Validator};
use crate::auth::{hash_password, verify_password, AuthUser};
use crate::schema::users;
use crate::AppState;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;

const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetPasswordRequest {
    pub new_password: Option<String>,
    pub current_password: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/users/set_password/",
    tag = "users",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Wrong current password or invalid new one"),
        (status = 401, description = "Unauthorized", body = DetailResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn set_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let mut v = Validator::new();
    let new_password = v.password("new_password", &req.new_password, MAX_PASSWORD_LENGTH);
    let current_password = v.require("current_password", &req.current_password);
    if current_password.is_some_and(|p| !verify_password(p, &user.password_hash)) {
        v.add("current_password", "Invalid password.");
    }
    let new_password = v.finish_with(new_password)?;

    let password_hash = hash_password(new_password)?;
    let mut conn = state.conn()?;

    diesel::update(users::table.find(user.id))
        .set(users::password_hash.eq(&password_hash))
        .execute(&mut conn)?;

    tracing::info!("User {} changed their password", user.id);

    Ok(StatusCode::NO_CONTENT)
}
