use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub bind_addr: String,
    /// Delay before a correct round is replaced by the next prompt.
    pub next_round_delay_ms: u64,
    /// When false, attempt counters are written inline instead of in a
    /// background task (used by the test suite for determinism).
    pub stats_save_async: bool,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Environment selects the optional TOML layer (defaults to dev)
        let env_name = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{env_name}")).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "ecole".to_string());

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let next_round_delay_ms = settings
            .get_int("game.next_round_delay_ms")
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .or_else(|| {
                env::var("NEXT_ROUND_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
            })
            .unwrap_or(2000);

        let stats_save_async = settings
            .get_bool("game.stats_save_async")
            .ok()
            .or_else(|| {
                env::var("STATS_SAVE_ASYNC")
                    .ok()
                    .map(|v| v != "0" && v.to_lowercase() != "false")
            })
            .unwrap_or(true);

        Ok(Config {
            mongo_uri,
            mongo_database,
            bind_addr,
            next_round_delay_ms,
            stats_save_async,
        })
    }
}
