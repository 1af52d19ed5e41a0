use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod auth;
mod db;
mod domain;
mod error;
mod models;
mod rest;
mod state;
#[cfg(test)]
mod test_support;

/// Connection parameters. The store URL and the public API key are both
/// required; starting without either is a configuration error, not a
/// degraded mode.
struct Config {
    database_url: String,
    api_key: String,
    bind_addr: SocketAddr,
}

impl Config {
    fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("OMNISHOP_DATABASE_URL").context("OMNISHOP_DATABASE_URL must be set")?;
        let api_key = env::var("OMNISHOP_API_KEY").context("OMNISHOP_API_KEY must be set")?;
        let bind_addr = env::var("OMNISHOP_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .context("OMNISHOP_BIND_ADDR must be host:port")?;
        Ok(Config {
            database_url,
            api_key,
            bind_addr,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    info!("Setting up database");
    let db = db::DbConnection::new(&config.database_url).await?;

    let app_state = state::AppState::new(db, config.api_key);

    // CORS setup to allow the dashboard pages to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = rest::router(app_state).layer(cors);

    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
