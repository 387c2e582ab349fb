//! Field validators shared by request handling and fixture loading.

use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of recipe, tag and ingredient names.
pub const MAX_NAME_LENGTH: usize = 200;
/// Maximum length of usernames and first/last names.
pub const MAX_USER_FIELD_LENGTH: usize = 150;
pub const MAX_EMAIL_LENGTH: usize = 254;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid regex"));
static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));
static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid regex"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

pub fn is_slug(value: &str) -> bool {
    SLUG.is_match(value)
}

pub fn is_username(value: &str) -> bool {
    USERNAME.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    value.len() <= MAX_EMAIL_LENGTH && EMAIL.is_match(value)
}

/// Length in characters, not bytes; names are frequently Cyrillic.
pub fn exceeds(value: &str, max: usize) -> bool {
    value.chars().count() > max
}
