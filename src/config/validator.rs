//! Sanity checks for `QueryConfig`.

use crate::config::QueryConfig;
use crate::error::ConfigError;

pub fn validate(config: &QueryConfig) -> Result<(), ConfigError> {
    if config.min_search_length == 0 {
        return Err(ConfigError::Validation("min_search_length must be at least 1".into()));
    }
    if config.max_page_size == 0 {
        return Err(ConfigError::Validation("max_page_size must be at least 1".into()));
    }
    let sep = config.sort_separator;
    if sep.is_alphanumeric() || sep.is_whitespace() || sep == '_' {
        return Err(ConfigError::Validation(format!(
            "sort_separator '{}' would collide with field names",
            sep
        )));
    }
    Ok(())
}
