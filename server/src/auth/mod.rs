mod crypto;
mod db;
mod extractor;

pub use crypto::{hash_password, verify_password, CryptoError};
pub use db::{create_token, revoke_token, TokenError};
pub use extractor::{token_from_headers, AuthError, AuthUser, TOKEN_PREFIX};
