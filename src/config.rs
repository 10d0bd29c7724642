use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{LATEST_SEMESTER_TTL, SEARCH_RESULT_TTL};
use crate::error::AppError;
use crate::models::SemesterId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Sqlite,
}

impl FromStr for CacheBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(AppError::Config(format!("unknown CACHE_BACKEND: {}", other))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub cache_backend: CacheBackend,
    pub baseline_semester: SemesterId,
    pub latest_ttl: Duration,
    pub search_ttl: Duration,
    pub cache_purge_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://catalog.db".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_connections: 5,
            cache_backend: CacheBackend::Memory,
            baseline_semester: SemesterId::BASELINE,
            latest_ttl: LATEST_SEMESTER_TTL,
            search_ttl: SEARCH_RESULT_TTL,
            cache_purge_interval: Duration::from_secs(600),
        }
    }
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: parse_or(&lookup, "BIND_ADDR", defaults.bind_addr)?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            cache_backend: parse_or(&lookup, "CACHE_BACKEND", defaults.cache_backend)?,
            baseline_semester: parse_or(&lookup, "BASELINE_SEMESTER", defaults.baseline_semester)?,
            latest_ttl: secs_or(&lookup, "LATEST_SEMESTER_TTL_SECS", defaults.latest_ttl)?,
            search_ttl: secs_or(&lookup, "SEARCH_TTL_SECS", defaults.search_ttl)?,
            cache_purge_interval: secs_or(
                &lookup,
                "CACHE_PURGE_INTERVAL_SECS",
                defaults.cache_purge_interval,
            )?,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{} is invalid: {}", key, e))),
        None => Ok(default),
    }
}

fn secs_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, AppError> {
    let secs = parse_or(lookup, key, default.as_secs())?;
    if secs == 0 {
        return Err(AppError::Config(format!("{} must be positive", key)));
    }
    Ok(Duration::from_secs(secs))
}
