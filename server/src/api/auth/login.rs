use crate::api::{ApiError, DetailResponse, JsonBody, Validator, NON_FIELD_ERRORS};
use crate::auth::{create_token, verify_password};
use crate::models::User;
use crate::schema::users;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub auth_token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/token/login/",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "cook@example.com", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials"),
        (status = 500, description = "Internal error", body = DetailResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut v = Validator::new();
    let email = v.require("email", &req.email);
    let password = v.require("password", &req.password);
    let (email, password) = v.finish_with(email.zip(password))?;

    let mut conn = state.conn()?;

    let user: Option<User> = users::table
        .filter(users::email.eq(email))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    let user = match user {
        Some(u) if verify_password(password, &u.password_hash) => u,
        _ => {
            tracing::info!("Rejected login attempt");
            return Err(ApiError::field(NON_FIELD_ERRORS, INVALID_CREDENTIALS));
        }
    };

    let auth_token = create_token(&mut conn, user.id, state.config.token_ttl_days)?;

    Ok((StatusCode::OK, Json(LoginResponse { auth_token })))
}
