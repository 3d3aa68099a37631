use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::links::cache::LinkCache;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Short-link resolution cache. Redis when `REDIS_URL` is set, otherwise a no-op.
    pub link_cache: Arc<dyn LinkCache>,
}
