//! Database bootstrap and connection pool.

use crate::config::{ServerConfig, ENV_DATABASE_URL};
use crate::error::{AppError, ConfigError};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(&admin_url).map_err(|_| invalid_url(database_url))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Pool whose connections resolve unqualified table names in `config.schema`.
pub async fn connect_pool(config: &ServerConfig) -> Result<PgPool, AppError> {
    let opts = PgConnectOptions::from_str(&config.database_url).map_err(|_| invalid_url(&config.database_url))?;
    let pool = pool_options(config).connect_with(opts).await?;
    tracing::info!(schema = %config.schema, max_connections = config.max_connections, "connected");
    Ok(pool)
}

/// Like [`connect_pool`] but defers connecting until first use.
pub fn connect_pool_lazy(config: &ServerConfig) -> Result<PgPool, AppError> {
    let opts = PgConnectOptions::from_str(&config.database_url).map_err(|_| invalid_url(&config.database_url))?;
    Ok(pool_options(config).connect_lazy_with(opts))
}

fn pool_options(config: &ServerConfig) -> PgPoolOptions {
    let set_path = format!("SET search_path TO {}", quote_ident(&config.schema));
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .after_connect(move |conn, _meta| {
            let set_path = set_path.clone();
            Box::pin(async move {
                sqlx::query(&set_path).execute(&mut *conn).await?;
                Ok(())
            })
        })
}

fn invalid_url(url: &str) -> AppError {
    AppError::Config(ConfigError::InvalidValue {
        key: ENV_DATABASE_URL,
        value: url.to_string(),
    })
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url.rfind('/').ok_or_else(|| invalid_url(url))? + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_url_targets_postgres_database() {
        let (admin, db) = parse_db_name_from_url("postgres://u:p@localhost:5432/registry?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(db, "registry");
    }

    #[test]
    fn url_without_path_is_a_config_error() {
        assert!(matches!(parse_db_name_from_url("localhost"), Err(AppError::Config(_))));
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("registry"), "\"registry\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
