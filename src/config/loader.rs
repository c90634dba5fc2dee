//! Load `ServerConfig` from the process environment (after `.env`, if any).

use crate::config::types::{QueryConfig, ServerConfig};
use crate::config::validate;
use crate::error::ConfigError;
use std::str::FromStr;

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_SCHEMA: &str = "REGISTRY_SCHEMA";
pub const ENV_BIND: &str = "REGISTRY_BIND";
pub const ENV_MAX_CONNECTIONS: &str = "REGISTRY_MAX_CONNECTIONS";
pub const ENV_MIN_SEARCH_LENGTH: &str = "REGISTRY_MIN_SEARCH_LENGTH";
pub const ENV_MAX_PAGE_SIZE: &str = "REGISTRY_MAX_PAGE_SIZE";

/// Read config from env. Loads `.env` first; a missing `.env` is not an error.
pub fn load_from_env() -> Result<ServerConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_with(|key| std::env::var(key).ok())
}

/// Build config from an arbitrary key lookup. Unset keys take their defaults.
pub fn load_with<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = QueryConfig::default();
    let query = QueryConfig {
        min_search_length: parse_or(&lookup, ENV_MIN_SEARCH_LENGTH, defaults.min_search_length)?,
        max_page_size: parse_or(&lookup, ENV_MAX_PAGE_SIZE, defaults.max_page_size)?,
        sort_separator: defaults.sort_separator,
    };
    validate(&query)?;

    let schema = lookup(ENV_SCHEMA).unwrap_or_else(|| "public".into());
    if !is_identifier(&schema) {
        return Err(ConfigError::Validation(format!(
            "{} must be a plain identifier, got '{}'",
            ENV_SCHEMA, schema
        )));
    }

    Ok(ServerConfig {
        database_url: lookup(ENV_DATABASE_URL).unwrap_or_else(|| "postgres://localhost/registry".into()),
        schema,
        bind_addr: lookup(ENV_BIND).unwrap_or_else(|| "0.0.0.0:3000".into()),
        max_connections: parse_or(&lookup, ENV_MAX_CONNECTIONS, 5)?,
        query,
    })
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
