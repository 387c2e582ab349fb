use crate::api::{ApiError, DetailResponse};
use crate::auth::{revoke_token, token_from_headers, AuthUser};
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};

#[utoipa::path(
    post,
    path = "/api/auth/token/logout/",
    tag = "auth",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Unauthorized", body = DetailResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    // AuthUser already accepted this header
    let token = token_from_headers(&headers)?;
    let mut conn = state.conn()?;

    if revoke_token(&mut conn, token)? {
        tracing::debug!("Revoked token for user {}", user.id);
    }

    Ok(StatusCode::NO_CONTENT)
}
