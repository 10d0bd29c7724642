use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_search::api::router;
use course_search::cache::{CacheJanitor, CacheStore, MemoryCache, SqliteCache};
use course_search::config::{AppConfig, CacheBackend};
use course_search::state::AppState;
use course_search::store::SqliteCourseStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "course_search=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;

    let connect_options: SqliteConnectOptions = config.database_url.parse()?;
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connect_options.create_if_missing(true))
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let cache_store: Arc<dyn CacheStore> = match config.cache_backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::Sqlite => Arc::new(SqliteCache::new(pool.clone())),
    };
    info!("using {:?} cache backend", config.cache_backend);

    let janitor = CacheJanitor::new(cache_store.clone(), config.cache_purge_interval);
    tokio::spawn(janitor.start());

    let store = Arc::new(SqliteCourseStore::new(pool));
    let state = AppState::new(store, cache_store, &config);

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
