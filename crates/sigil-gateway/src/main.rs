mod app;
mod cli;
mod error;
mod handlers;
mod model;
mod state;

use crate::app::App;
use crate::cli::{StorageBackendArg, CLI};
use crate::state::AppState;
use clap::Parser;
use sigil_core::Repository;
use sigil_shortener::ShortenerService;
use sigil_storage::{InMemoryRepository, SqliteRepository};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = CLI::try_parse()?;

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        "starting gateway server"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(
                config.listen_addr,
                config.base_url,
                InMemoryRepository::new(),
            )
            .await
        }
        StorageBackendArg::Sqlite => {
            let sqlite_dsn = config
                .sqlite_dsn
                .ok_or("sqlite dsn is required when storage backend is sqlite")?;
            let repository = SqliteRepository::connect(&sqlite_dsn).await?;
            run_server(config.listen_addr, config.base_url, repository).await
        }
    }
}

async fn run_server<R: Repository>(
    listen_addr: SocketAddr,
    base_url: String,
    repository: R,
) -> Result<(), Box<dyn std::error::Error>> {
    let shortener = Arc::new(ShortenerService::new(repository));
    let state = AppState::new(shortener, base_url);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, App::router(state)).await?;
    Ok(())
}
