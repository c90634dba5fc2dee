//! Registry API: list/get/save REST backend for a business registry (tools,
//! persons, stocks, brands, categories, labels, roles, comments) on PostgreSQL.

pub mod config;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod query;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{load_from_env, QueryConfig, ServerConfig};
pub use error::{AppError, ConfigError};
pub use handlers::API_PREFIX;
pub use migration::apply_migrations;
pub use routes::{common_routes, entity_routes};
pub use service::CrudService;
pub use state::AppState;
pub use store::{connect_pool, connect_pool_lazy, ensure_database_exists};

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Ambient routes at the root and entity routes under [`API_PREFIX`].
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest(API_PREFIX, entity_routes(state))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}
