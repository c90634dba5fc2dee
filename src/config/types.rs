//! Runtime configuration: query-engine bounds and server settings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_SEARCH_LENGTH: usize = 3;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 50;
pub const DEFAULT_SORT_SEPARATOR: char = ',';

/// Bounds shared by every entity family's list endpoint. Built once at
/// startup and handed to the factories, the sort resolver and the pagination
/// adapter as an argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Search text shorter than this (in characters) is ignored.
    pub min_search_length: usize,
    /// Largest accepted `size` on list requests.
    pub max_page_size: u32,
    /// Separates field and direction in a sort directive.
    pub sort_separator: char,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            min_search_length: DEFAULT_MIN_SEARCH_LENGTH,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            sort_separator: DEFAULT_SORT_SEPARATOR,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub database_url: String,
    /// Schema holding the registry tables; set as `search_path` on every connection.
    pub schema: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub query: QueryConfig,
}
