use crate::config::Config;
use rand::{rngs::StdRng, SeedableRng};
use redis::aio::ConnectionManager;
use std::sync::{Arc, Mutex};

use progress_store::{purge_interval, InMemoryProgressStore, ProgressStore, RedisProgressStore};

pub mod answer_service;
pub mod catalog;
pub mod evaluator;
pub mod feedback;
pub mod practice_service;
pub mod progress_store;
pub mod progression;
pub mod question_generator;

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ProgressStore>,
    rng: Mutex<StdRng>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn ProgressStore> = match config.redis_uri.clone() {
            Some(uri) => {
                tracing::info!("Attempting to connect to Redis...");
                let client = redis::Client::open(uri)?;

                let redis = tokio::time::timeout(
                    std::time::Duration::from_secs(30),
                    ConnectionManager::new(client),
                )
                .await
                .map_err(|_| anyhow::anyhow!("Redis connection timeout after 30s"))??;

                let store = RedisProgressStore::new(redis, config.session_ttl_seconds);
                store.ping().await?;
                tracing::info!("Redis connection established successfully");
                Arc::new(store)
            }
            None => {
                tracing::info!(
                    "No Redis URI configured, keeping visitor sessions in memory (ttl={}s)",
                    config.session_ttl_seconds
                );
                let store = Arc::new(InMemoryProgressStore::new(config.session_ttl_seconds));
                store.spawn_purge_task(purge_interval(config.session_ttl_seconds));
                store
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn ProgressStore>) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            config,
            store,
            rng: Mutex::new(rng),
        }
    }

    /// Runs `f` with the shared random source. Never hold across an await.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut guard = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}
