//! Shared application state for all routes.

use crate::config::QueryConfig;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// List-query bounds, fixed at startup.
    pub query: Arc<QueryConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, query: QueryConfig) -> Self {
        AppState {
            pool,
            query: Arc::new(query),
        }
    }
}
