use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use song_service::{
    app,
    db::{Database, MemoryStore, SharedStore, SongStore, StoreError},
    secrets::{SECRET_MANAGER, StoreKind, redacted},
    seed::{SeedOutcome, load_seed_file, seed_if_empty},
};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

async fn connect_store() -> anyhow::Result<SharedStore> {
    match SECRET_MANAGER.store_kind()? {
        StoreKind::Memory => {
            warn!("Using in-memory store, data will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreKind::Postgres => {
            let url = SECRET_MANAGER.database_url()?;
            info!("connecting to url: {}", redacted(&url));

            let max_connections = SECRET_MANAGER.max_connections()?;
            let database = match Database::new(url.as_str(), max_connections).await {
                Ok(db) => db,
                Err(StoreError::Authentication(msg)) => {
                    anyhow::bail!("Authentication error: {}", msg);
                }
                Err(e) => return Err(e).context("Connection error"),
            };
            database.ping().await.context("Connection error")?;
            info!("📊 Successfully connected to PostgreSQL");

            database.migrate().await.context("Database migrations failed")?;
            info!("📊 Database migrations completed");

            Ok(Arc::new(database))
        }
    }
}

async fn seed(store: &SharedStore) -> anyhow::Result<()> {
    let seed_file = SECRET_MANAGER.get("SEED_FILE");
    let songs = match load_seed_file(Path::new(&seed_file)).await {
        Ok(songs) => songs,
        Err(e) => {
            warn!("Not seeding: {:#}", e);
            return Ok(());
        }
    };

    match seed_if_empty(store.as_ref(), songs).await? {
        SeedOutcome::Seeded { inserted } => {
            info!("🎵 Loaded {} songs from {}", inserted, seed_file)
        }
        SeedOutcome::Skipped { existing } => {
            info!("🎵 Collection already holds {} songs", existing)
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutting down");
}

async fn run() -> anyhow::Result<()> {
    let store = connect_store().await?;
    seed(&store).await.context("Seeding failed")?;

    let port = SECRET_MANAGER.port()?;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("cannot bind port {}", port))?;

    info!("🎧 Song service listening on {}", listener.local_addr()?);
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("song_service=info,tower_http=info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        error!("❌ {:#}", e);
        std::process::exit(1);
    }
}
