use crate::api::{ApiError, FieldErrors, JsonBody, Validator};
use crate::auth::hash_password;
use crate::models::{NewUser, User};
use crate::schema::users;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use foodgram_core::validation::{
    is_email, is_username, MAX_EMAIL_LENGTH, MAX_USER_FIELD_LENGTH,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const MAX_PASSWORD_LENGTH: usize = 128;
const EMAIL_TAKEN: &str = "A user with that email already exists.";
const USERNAME_TAKEN: &str = "A user with that username already exists.";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatedUserResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for CreatedUserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/users/",
    tag = "users",
    request_body(content = CreateUserRequest, example = json!({
        "email": "cook@example.com",
        "username": "cook",
        "first_name": "Ada",
        "last_name": "Cook",
        "password": "s3cret-pass"
    })),
    responses(
        (status = 201, description = "User registered", body = CreatedUserResponse),
        (status = 400, description = "Invalid or duplicate fields")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut v = Validator::new();
    let email = v.text("email", &req.email, MAX_EMAIL_LENGTH);
    if email.is_some_and(|e| !is_email(e)) {
        v.add("email", "Enter a valid email address.");
    }
    let username = v.text("username", &req.username, MAX_USER_FIELD_LENGTH);
    if username.is_some_and(|u| !is_username(u)) {
        v.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
    let first_name = v.text("first_name", &req.first_name, MAX_USER_FIELD_LENGTH);
    let last_name = v.text("last_name", &req.last_name, MAX_USER_FIELD_LENGTH);
    let password = v.password("password", &req.password, MAX_PASSWORD_LENGTH);
    let (((email, username), (first_name, last_name)), password) = v.finish_with(
        email
            .zip(username)
            .zip(first_name.zip(last_name))
            .zip(password),
    )?;

    let mut conn = state.conn()?;

    let mut taken = FieldErrors::new();
    let existing: Vec<(String, String)> = users::table
        .filter(users::email.eq(email).or(users::username.eq(username)))
        .select((users::email, users::username))
        .load(&mut conn)?;
    for (existing_email, existing_username) in existing {
        if existing_email == email {
            taken.insert("email".to_string(), vec![EMAIL_TAKEN.to_string()]);
        }
        if existing_username == username {
            taken.insert("username".to_string(), vec![USERNAME_TAKEN.to_string()]);
        }
    }
    if !taken.is_empty() {
        return Err(ApiError::Fields(taken));
    }

    let password_hash = hash_password(password)?;

    let user = diesel::insert_into(users::table)
        .values(&NewUser {
            email,
            username,
            first_name,
            last_name,
            password_hash: &password_hash,
        })
        .returning(User::as_returning())
        .get_result(&mut conn)
        .map_err(|e| match e {
            // Lost a race with a concurrent registration
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
                match info.constraint_name() {
                    Some("users_email_key") => ApiError::field("email", EMAIL_TAKEN),
                    _ => ApiError::field("username", USERNAME_TAKEN),
                }
            }
            other => ApiError::from(other),
        })?;

    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(CreatedUserResponse::from(user))))
}
