use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if `DATABASE_URL` is missing; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Enables the Redis short-link cache when set.
    pub redis_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Prefix for issued short links, without trailing slash.
    pub public_base_url: String,
    pub link_cache_ttl_secs: u64,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port: u16 = parse_env("PORT", 8080)?;
        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: std::env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            public_base_url: normalize_base_url(&public_base_url),
            link_cache_ttl_secs: parse_env("LINK_CACHE_TTL_SECS", 86_400)?,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
