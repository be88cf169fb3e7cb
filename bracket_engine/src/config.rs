use std::{env, fmt::Display, str::FromStr};

use chrono::Duration;
use log::*;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/brackets.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_STANDINGS_TTL: Duration = Duration::minutes(5);
const DEFAULT_EVENT_BUFFER_SIZE: usize = 32;

/// Runtime settings for the bracket engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// How long computed standings stay in the cache before they are recomputed.
    pub standings_ttl: Duration,
    /// Channel capacity for each event hook.
    pub event_buffer_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            standings_ttl: DEFAULT_STANDINGS_TTL,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

impl EngineConfig {
    /// Reads the configuration from `BRACKET_*` environment variables. Missing or invalid values fall back to the
    /// defaults.
    pub fn from_env_or_default() -> Self {
        let database_url = env::var("BRACKET_DATABASE_URL").unwrap_or_else(|_| {
            info!("🪛️ BRACKET_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = parse_env("BRACKET_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);
        let ttl_secs = parse_env("BRACKET_STANDINGS_TTL_SECS", DEFAULT_STANDINGS_TTL.num_seconds());
        let event_buffer_size = parse_env("BRACKET_EVENT_BUFFER_SIZE", DEFAULT_EVENT_BUFFER_SIZE);
        Self { database_url, max_connections, standings_ttl: Duration::seconds(ttl_secs), event_buffer_size }
    }
}

fn parse_env<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(s) => s.parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {key}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => default,
    }
}
