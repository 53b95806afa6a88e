mod config;
mod db;
mod errors;
mod export;
mod form;
mod models;
mod render;
mod routes;
mod session;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::session::ConfiguredSession;
use crate::state::AppState;
use crate::store::{InMemoryRecordStore, PgRecordStore, RecordStore};

const DRAFT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resumeforge v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;

    match &config.session_user {
        Some(user) => info!(user_id = %user.id, "Session user configured"),
        None => warn!("No SESSION_USER_ID set; saving and history require a signed-in user"),
    }
    let session = Arc::new(ConfiguredSession::new(config.session_user.clone()));

    if let Some(dir) = &config.export_dir {
        info!("Exported PDFs are also saved to {}", dir.display());
    }

    let state = AppState::new(config.clone(), store, session);
    state.drafts.spawn_sweeper(DRAFT_SWEEP_INTERVAL);
    info!(
        "Idle forms are discarded after {} minutes",
        config.draft_idle_timeout.as_secs() / 60
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise a process-local store.
async fn build_store(config: &Config) -> Result<Arc<dyn RecordStore>> {
    let Some(database_url) = &config.database_url else {
        warn!("DATABASE_URL not set; resumes are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryRecordStore::new(
            config.persist_full_record,
        )));
    };

    let pool = create_pool(database_url).await?;
    let store = PgRecordStore::new(pool, config.persist_full_record);
    store
        .ensure_schema()
        .await
        .context("Failed to prepare the resumes table")?;
    if !config.persist_full_record {
        warn!("PERSIST_FULL_RECORD=false; optional sections and the profile image are not saved");
    }
    Ok(Arc::new(store))
}
