use std::{env, fmt::Display, str::FromStr};

use tracing::info;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_PAGE_SIZE: i64 = 6;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub page_size: i64,
    pub token_ttl_days: i64,
    pub shopping_list_filename: String,
    pub media_url_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let page_size: i64 = try_load("PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ConfigError::Invalid {
                key: "PAGE_SIZE",
                value: page_size.to_string(),
                reason: format!("must be between 1 and {}", MAX_PAGE_SIZE),
            });
        }

        let token_ttl_days: i64 = try_load("TOKEN_TTL_DAYS", 30)?;
        if token_ttl_days < 1 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_DAYS",
                value: token_ttl_days.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        Ok(Self {
            database_url,
            bind_addr: try_load("BIND_ADDR", DEFAULT_BIND_ADDR.to_string())?,
            page_size,
            token_ttl_days,
            shopping_list_filename: try_load(
                "SHOPPING_LIST_FILENAME",
                "shopping_list.txt".to_string(),
            )?,
            media_url_prefix: try_load("MEDIA_URL_PREFIX", "/api/media".to_string())?
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Settings for tests and tooling: defaults everywhere but the database.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            token_ttl_days: 30,
            shopping_list_filename: "shopping_list.txt".to_string(),
            media_url_prefix: "/api/media".to_string(),
        }
    }

    pub fn image_url(&self, image_id: uuid::Uuid) -> String {
        format!("{}/{}", self.media_url_prefix, image_id)
    }
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
