//! Registry server: loads configuration, prepares the database and serves the API.
//!
//! Run from repo root: `cargo run -p registry-server`

use registry_api::{apply_migrations, app, connect_pool, ensure_database_exists, load_from_env, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("registry_api=info,registry_server=info")),
        )
        .init();

    let config = load_from_env()?;
    ensure_database_exists(&config.database_url).await?;
    let pool = connect_pool(&config).await?;
    apply_migrations(&pool, &config.schema).await?;

    let state = AppState::new(pool, config.query.clone());
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("registry listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
