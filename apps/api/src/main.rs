mod categories;
mod config;
mod db;
mod errors;
mod links;
mod models;
mod resumes;
mod routes;
mod state;
mod tags;
mod templates;
mod usage;
mod validation;
mod variables;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::links::cache::{LinkCache, NoopLinkCache, RedisLinkCache};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Outreach API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url, config.db_max_connections).await?;

    // Initialize short-link cache
    let link_cache = build_link_cache(&config).await;

    let state = AppState {
        db,
        config: config.clone(),
        link_cache,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis cache when configured and reachable; otherwise every redirect hits the database.
async fn build_link_cache(config: &Config) -> Arc<dyn LinkCache> {
    let Some(redis_url) = config.redis_url.as_deref() else {
        info!("REDIS_URL not set, short-link cache disabled");
        return Arc::new(NoopLinkCache);
    };

    match RedisLinkCache::connect(redis_url, config.link_cache_ttl_secs).await {
        Ok(cache) => {
            info!("Redis short-link cache initialized");
            Arc::new(cache)
        }
        Err(e) => {
            warn!("Redis unavailable ({e}), short-link cache disabled");
            Arc::new(NoopLinkCache)
        }
    }
}
