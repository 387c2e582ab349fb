use crate::db::DbPool;
use crate::models::{NewAuthToken, User};
use crate::schema::{auth_tokens, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;

use super::crypto::{generate_token, hash_token, CryptoError};
use super::extractor::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

/// Issue a new token for `user_id` and return it in plain text.
pub fn create_token(
    conn: &mut PgConnection,
    user_id: i32,
    ttl_days: i64,
) -> Result<String, TokenError> {
    let token = generate_token()?;
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::days(ttl_days);

    diesel::insert_into(auth_tokens::table)
        .values(&NewAuthToken {
            user_id,
            token_hash: &token_hash,
            expires_at,
        })
        .execute(conn)?;

    Ok(token)
}

/// Delete the token; returns whether anything was removed.
pub fn revoke_token(conn: &mut PgConnection, token: &str) -> Result<bool, diesel::result::Error> {
    let deleted = diesel::delete(auth_tokens::table.filter(auth_tokens::token_hash.eq(hash_token(token))))
        .execute(conn)?;
    Ok(deleted > 0)
}

/// Resolve a presented token to its (non-expired) user.
pub async fn get_user_from_token(pool: &DbPool, token: &str) -> Result<Option<User>, AuthError> {
    let mut conn = pool.get().map_err(|e| {
        tracing::error!("Failed to get DB connection for token lookup: {}", e);
        AuthError::Unavailable
    })?;
    let token_hash = hash_token(token);

    auth_tokens::table
        .inner_join(users::table)
        .filter(auth_tokens::token_hash.eq(&token_hash))
        .filter(auth_tokens::expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(&mut conn)
        .optional()
        .map_err(|e| {
            tracing::error!("Token lookup failed: {}", e);
            AuthError::Unavailable
        })
}
