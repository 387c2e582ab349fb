use crate::api::DetailResponse;
use crate::models::User;
use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::db::get_user_from_token;

/// Scheme expected in the Authorization header: `Token <auth_token>`.
pub const TOKEN_PREFIX: &str = "Token ";

/// Extractor that validates the Authorization header and provides the authenticated user.
///
/// Use this in any handler that requires authentication:
/// ```ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     // user is the authenticated User
/// }
/// ```
/// Handlers that serve anonymous readers too take `Option<AuthUser>` instead;
/// a missing header then yields `None` while a bad token is still rejected.
pub struct AuthUser(pub User);

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authentication credentials were not provided.")]
    MissingHeader,
    #[error("Invalid token header.")]
    InvalidHeader,
    #[error("Invalid token.")]
    InvalidToken,
    #[error("Authentication backend unavailable.")]
    Unavailable,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        };

        (
            status,
            Json(DetailResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Pull the raw token out of the Authorization header.
pub fn token_from_headers(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidHeader)?;

    let token = auth_str
        .strip_prefix(TOKEN_PREFIX)
        .ok_or(AuthError::InvalidHeader)?
        .trim();

    if token.is_empty() || token.contains(' ') {
        return Err(AuthError::InvalidHeader);
    }

    Ok(token)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = token_from_headers(&parts.headers)?;

        let user = get_user_from_token(&state.pool, token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(AuthUser(user))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Ok(None);
        }
        <AuthUser as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_token_from_headers() {
        assert_eq!(token_from_headers(&headers("Token abc123")).unwrap(), "abc123");
    }

    #[test]
    fn test_token_from_headers_rejects_other_schemes() {
        assert!(matches!(
            token_from_headers(&headers("Bearer abc123")),
            Err(AuthError::InvalidHeader)
        ));
        assert!(matches!(
            token_from_headers(&headers("Token ")),
            Err(AuthError::InvalidHeader)
        ));
        assert!(matches!(
            token_from_headers(&headers("Token a b")),
            Err(AuthError::InvalidHeader)
        ));
        assert!(matches!(
            token_from_headers(&HeaderMap::new()),
            Err(AuthError::MissingHeader)
        ));
    }
}
