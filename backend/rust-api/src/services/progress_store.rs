use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::{sync::RwLock, task::JoinHandle, time::sleep};

use crate::metrics::track_store_operation;
use crate::models::VisitorSession;
use crate::utils::retry::{retry_async_with_config, RetryConfig};

/// Keyed visitor-id → session storage. Handlers load at the start of a
/// request and save once at the end.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn load(&self, visitor_id: &str) -> Result<Option<VisitorSession>>;

    /// Replaces the stored session and refreshes its expiry.
    async fn save(&self, session: &VisitorSession) -> Result<()>;

    async fn delete(&self, visitor_id: &str) -> Result<()>;

    /// Backend name for health output.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

struct StoredSession {
    session: VisitorSession,
    expires_at: DateTime<Utc>,
}

/// Process-local store; entries expire after the session lifetime.
pub struct InMemoryProgressStore {
    entries: RwLock<HashMap<String, StoredSession>>,
    ttl: Duration,
}

impl InMemoryProgressStore {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::seconds(i64::try_from(ttl_seconds).unwrap_or(i64::MAX / 1000)),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Drops expired entries; returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, stored| stored.expires_at > now);
        before - entries.len()
    }

    /// Spawns the eviction loop; abandoned visitors are otherwise never loaded again.
    pub fn spawn_purge_task(self: &Arc<Self>, interval: std::time::Duration) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            tracing::info!(
                "Starting session purge loop (interval {}s)",
                interval.as_secs()
            );

            loop {
                sleep(interval).await;
                let removed = store.purge_expired().await;
                if removed > 0 {
                    tracing::debug!("Purged {} expired visitor sessions", removed);
                }
            }
        })
    }
}

/// Purge cadence for a session lifetime: the TTL itself, clamped to 1..=60 seconds.
pub fn purge_interval(ttl_seconds: u64) -> std::time::Duration {
    std::time::Duration::from_secs(ttl_seconds.clamp(1, 60))
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn load(&self, visitor_id: &str) -> Result<Option<VisitorSession>> {
        track_store_operation("get", async {
            let now = Utc::now();
            {
                let entries = self.entries.read().await;
                match entries.get(visitor_id) {
                    Some(stored) if stored.expires_at > now => {
                        return Ok(Some(stored.session.clone()))
                    }
                    Some(_) => {}
                    None => return Ok(None),
                }
            }

            tracing::debug!("Visitor session {} expired", visitor_id);
            self.entries.write().await.remove(visitor_id);
            Ok(None)
        })
        .await
    }

    async fn save(&self, session: &VisitorSession) -> Result<()> {
        track_store_operation("set", async {
            let expires_at = Utc::now() + self.ttl;
            self.entries.write().await.insert(
                session.visitor_id.clone(),
                StoredSession {
                    session: session.clone(),
                    expires_at,
                },
            );
            Ok(())
        })
        .await
    }

    async fn delete(&self, visitor_id: &str) -> Result<()> {
        track_store_operation("del", async {
            self.entries.write().await.remove(visitor_id);
            Ok(())
        })
        .await
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Redis-backed store: one JSON blob per visitor with `SETEX` expiry.
pub struct RedisProgressStore {
    redis: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisProgressStore {
    pub fn new(redis: ConnectionManager, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }

    fn key(visitor_id: &str) -> String {
        format!("tutor:visitor:{}", visitor_id)
    }
}

#[async_trait]
impl ProgressStore for RedisProgressStore {
    async fn load(&self, visitor_id: &str) -> Result<Option<VisitorSession>> {
        let key = Self::key(visitor_id);

        let raw: Option<String> = track_store_operation("get", async {
            retry_async_with_config(RetryConfig::default(), || async {
                let mut conn = self.redis.clone();
                redis::cmd("GET")
                    .arg(&key)
                    .query_async::<Option<String>>(&mut conn)
                    .await
            })
            .await
            .context("Failed to load visitor session from Redis")
        })
        .await?;

        raw.map(|json| {
            serde_json::from_str::<VisitorSession>(&json)
                .context("Failed to deserialize visitor session")
        })
        .transpose()
    }

    async fn save(&self, session: &VisitorSession) -> Result<()> {
        let key = Self::key(&session.visitor_id);
        let json = serde_json::to_string(session).context("Failed to serialize visitor session")?;

        track_store_operation("setex", async {
            retry_async_with_config(RetryConfig::aggressive(), || async {
                let mut conn = self.redis.clone();
                redis::cmd("SETEX")
                    .arg(&key)
                    .arg(self.ttl_seconds)
                    .arg(&json)
                    .query_async::<()>(&mut conn)
                    .await
            })
            .await
            .context("Failed to save visitor session to Redis")
        })
        .await
    }

    async fn delete(&self, visitor_id: &str) -> Result<()> {
        let key = Self::key(visitor_id);

        track_store_operation("del", async {
            let mut conn = self.redis.clone();
            redis::cmd("DEL")
                .arg(&key)
                .query_async::<()>(&mut conn)
                .await
                .context("Failed to delete visitor session from Redis")
        })
        .await
    }

    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.redis.clone();
        tokio::time::timeout(
            std::time::Duration::from_millis(500),
            redis::cmd("PING").query_async::<String>(&mut conn),
        )
        .await
        .map_err(|_| anyhow::anyhow!("Redis timeout after 500ms"))??;
        Ok(())
    }
}
