use std::sync::Arc;

use mongodb::{Client as MongoClient, Database};

use crate::config::Config;
use crate::models::catalog::GameCatalog;

pub mod answer_service;
pub mod content_service;
pub mod session_service;
pub mod stats_service;
pub mod student_service;

use session_service::{default_celebration_hook, CelebrationHook, SessionRegistry};
use stats_service::{MongoStatsStore, StatsStore};

/// Shared application state: configuration, database handle, the stats
/// store, the session registry and the read-only game catalog.
pub struct AppState {
    pub config: Config,
    pub mongo: Database,
    pub stats: Arc<dyn StatsStore>,
    pub registry: Arc<SessionRegistry>,
    pub catalog: Arc<GameCatalog>,
    pub celebration: CelebrationHook,
}

impl AppState {
    /// Production wiring: attempt counters go to MongoDB.
    pub fn new(config: Config, mongo_client: MongoClient) -> Self {
        let mongo = mongo_client.database(&config.mongo_database);
        let stats = Arc::new(MongoStatsStore::new(&mongo));
        Self::with_stats_store(config, mongo_client, stats)
    }

    /// Custom store wiring, used by the test suite to stay database-free.
    pub fn with_stats_store(
        config: Config,
        mongo_client: MongoClient,
        stats: Arc<dyn StatsStore>,
    ) -> Self {
        let mongo = mongo_client.database(&config.mongo_database);
        Self {
            config,
            mongo,
            stats,
            registry: Arc::new(SessionRegistry::new()),
            catalog: Arc::new(GameCatalog::builtin()),
            celebration: default_celebration_hook(),
        }
    }

    pub fn with_celebration_hook(mut self, hook: CelebrationHook) -> Self {
        self.celebration = hook;
        self
    }
}
