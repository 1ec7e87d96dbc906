mod analysis;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod state;
mod users;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::catalog::SKILL_CATALOG;
use crate::analysis::matcher::SkillMatcher;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::users::store::SqliteUserStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillScan v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite user store
    let db = create_pool(&config.database_url).await?;
    let users = SqliteUserStore::new(db);
    users.migrate().await?;

    // Scratch directory for uploads
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("creating upload dir {}", config.upload_dir.display()))?;
    info!("Scratch uploads go to {}", config.upload_dir.display());

    // Compile the skill catalog once
    let matcher = SkillMatcher::new(SKILL_CATALOG).context("compiling skill catalog")?;
    info!("Skill matcher ready ({} skills)", SKILL_CATALOG.len());

    let state = AppState {
        config: config.clone(),
        users: Arc::new(users),
        matcher: Arc::new(matcher),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
