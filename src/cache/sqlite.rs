use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::cache::CacheStore;
use crate::error::CacheError;

/// Cache store backed by the `cache_entries` table; expiry is epoch milliseconds.
#[derive(Clone)]
pub struct SqliteCache {
    db: SqlitePool,
}

impl SqliteCache {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn ttl_ms(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

#[async_trait]
impl CacheStore for SqliteCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let value: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT value FROM cache_entries WHERE key = ? AND expires_at > ?")
                .bind(key)
                .bind(now_ms())
                .fetch_optional(&self.db)
                .await?;
        Ok(value)
    }

    async fn setex(&self, key: &str, ttl: Duration, value: &[u8]) -> Result<(), CacheError> {
        let expires_at = now_ms().saturating_add(ttl_ms(ttl));
        sqlx::query(
            r#"
            INSERT INTO cache_entries (key, value, expires_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                expires_at = excluded.expires_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, CacheError> {
        let removed = sqlx::query("DELETE FROM cache_entries WHERE expires_at <= ?")
            .bind(now_ms())
            .execute(&self.db)
            .await?
            .rows_affected();
        Ok(usize::try_from(removed).unwrap_or(usize::MAX))
    }
}
