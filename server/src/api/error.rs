use crate::auth::{AuthError, CryptoError, TokenError};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use foodgram_core::validation::exceeds;
use foodgram_core::ImageError;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Domain-rule violation body: `{"errors": "..."}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub errors: String,
}

/// Body for authentication, permission, not-found and server errors.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DetailResponse {
    pub detail: String,
}

/// Field-level validation errors: `{"<field>": ["message", ...]}`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A business rule was broken (duplicate favorite, self-subscription, ...).
    #[error("{0}")]
    Domain(String),

    #[error("Invalid input: {0:?}")]
    Fields(FieldErrors),

    /// Malformed request that cannot be pinned to one field.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("You do not have permission to perform this action.")]
    Forbidden,

    #[error("Not found.")]
    NotFound,

    #[error("Invalid page.")]
    InvalidPage,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn domain(message: impl Into<String>) -> Self {
        ApiError::Domain(message.into())
    }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        ApiError::Fields(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = |status: StatusCode, detail: String| {
            (status, Json(DetailResponse { detail })).into_response()
        };

        match self {
            ApiError::Domain(errors) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { errors })).into_response()
            }
            ApiError::Fields(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::BadRequest(message) => detail(StatusCode::BAD_REQUEST, message),
            ApiError::Auth(e) => e.into_response(),
            e @ ApiError::Forbidden => detail(StatusCode::FORBIDDEN, e.to_string()),
            e @ (ApiError::NotFound | ApiError::InvalidPage) => {
                detail(StatusCode::NOT_FOUND, e.to_string())
            }
            ApiError::Internal(message) => {
                tracing::error!("Request failed: {}", message);
                detail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        }
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => ApiError::NotFound,
            other => ApiError::Internal(format!("database error: {}", other)),
        }
    }
}

impl From<diesel::r2d2::PoolError> for ApiError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        ApiError::Internal(format!("database connection failed: {}", e))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::field(NON_FIELD_ERRORS, rejection.body_text())
    }
}

impl From<ImageError> for ApiError {
    fn from(e: ImageError) -> Self {
        ApiError::field("image", e.to_string())
    }
}

impl From<CryptoError> for ApiError {
    fn from(e: CryptoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

/// Collects field errors while validating a request body.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Record "This field is required." when `value` is `None`.
    pub fn require<'a, T>(&mut self, field: &str, value: &'a Option<T>) -> Option<&'a T> {
        if value.is_none() {
            self.add(field, REQUIRED);
        }
        value.as_ref()
    }

    /// Required, non-blank text of at most `max` characters, trimmed.
    pub fn text<'a>(
        &mut self,
        field: &str,
        value: &'a Option<String>,
        max: usize,
    ) -> Option<&'a str> {
        let value = self.require(field, value)?.trim();
        self.bounded(field, value, max)
    }

    /// Like [`Validator::text`] but keeps surrounding whitespace, which is
    /// significant in passwords.
    pub fn password<'a>(
        &mut self,
        field: &str,
        value: &'a Option<String>,
        max: usize,
    ) -> Option<&'a str> {
        let value = self.require(field, value)?;
        self.bounded(field, value, max)
    }

    fn bounded<'a>(&mut self, field: &str, value: &'a str, max: usize) -> Option<&'a str> {
        if value.is_empty() {
            self.add(field, BLANK);
            return None;
        }
        if exceeds(value, max) {
            self.add(
                field,
                format!("Ensure this field has no more than {} characters.", max),
            );
            return None;
        }
        Some(value)
    }

    /// Finish validation, yielding `value` when no field failed.
    pub fn finish_with<T>(self, value: Option<T>) -> Result<T, ApiError> {
        self.finish()?;
        value.ok_or_else(|| ApiError::Internal("validated value missing".to_string()))
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Fields(self.errors))
        }
    }
}

pub const NON_FIELD_ERRORS: &str = "non_field_errors";
pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_collects_errors_per_field() {
        let mut v = Validator::new();
        let name: Option<String> = None;
        assert!(v.require("name", &name).is_none());
        v.add("cooking_time", "Ensure this value is greater than or equal to 1.");
        v.add("cooking_time", "second");

        let Err(ApiError::Fields(errors)) = v.finish() else {
            panic!("expected field errors");
        };
        assert_eq!(errors["name"], vec![REQUIRED.to_string()]);
        assert_eq!(errors["cooking_time"].len(), 2);
    }

    #[test]
    fn test_text_rules() {
        let mut v = Validator::new();
        assert_eq!(v.text("a", &Some("  soup ".to_string()), 10), Some("soup"));
        assert_eq!(v.text("b", &Some("   ".to_string()), 10), None);
        assert_eq!(v.text("c", &Some("x".repeat(11)), 10), None);
        assert_eq!(v.text("d", &None, 10), None);

        let Err(ApiError::Fields(errors)) = v.finish_with(Some(())) else {
            panic!("expected field errors");
        };
        assert!(!errors.contains_key("a"));
        assert_eq!(errors["b"], vec![BLANK.to_string()]);
        assert_eq!(
            errors["c"],
            vec!["Ensure this field has no more than 10 characters.".to_string()]
        );
        assert_eq!(errors["d"], vec![REQUIRED.to_string()]);
    }

    #[test]
    fn test_password_keeps_whitespace() {
        let mut v = Validator::new();
        let padded = Some("  s3cret pass  ".to_string());
        assert_eq!(v.password("password", &padded, 128), Some("  s3cret pass  "));
        assert_eq!(v.password("empty", &Some(String::new()), 128), None);
        assert_eq!(v.password("long", &Some("x".repeat(129)), 128), None);

        let Err(ApiError::Fields(errors)) = v.finish() else {
            panic!("expected field errors");
        };
        assert!(!errors.contains_key("password"));
        assert_eq!(errors["empty"], vec![BLANK.to_string()]);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_empty_validator_passes() {
        assert!(Validator::new().finish().is_ok());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::domain("x").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(diesel::result::Error::NotFound)
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Auth(AuthError::MissingHeader)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
