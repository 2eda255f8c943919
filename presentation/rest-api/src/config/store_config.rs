use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use business::application::shopping_list::mutator::MutationPolicy;
use business::domain::shopping_list::repository::ShoppingListRepository;
use persistence::db::{DatabaseConfig, create_postgres_pool, run_migrations};
use persistence::memory::repository::ShoppingListRepositoryMemory;
use persistence::shopping_list::repository::ShoppingListRepositoryPostgres;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config.invalid_value: {key}={value}")]
    InvalidValue { key: String, value: String },
    #[error("config.database_url_missing")]
    DatabaseUrlMissing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Document store and mutation settings
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub policy: MutationPolicy,
    /// Title of a list created by its first item
    pub default_list_title: String,
}

impl StoreConfig {
    /// Load store configuration from environment variables
    ///
    /// Environment variables:
    /// - STORE_BACKEND: "postgres" or "memory" (default: "postgres" when
    ///   DATABASE_URL is set, "memory" otherwise)
    /// - DATABASE_URL: PostgreSQL connection string
    /// - DATABASE_MAX_CONNECTIONS (default: 5)
    /// - STORE_TIMEOUT_MS (default: 10000)
    /// - STORE_MAX_ATTEMPTS (default: 5)
    /// - STORE_RETRY_BACKOFF_MS (default: 50)
    /// - DEFAULT_LIST_TITLE (default: "Shopping")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = var("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let backend = match var("STORE_BACKEND").as_deref().map(str::trim) {
            Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "STORE_BACKEND".to_string(),
                    value: other.to_string(),
                });
            }
            None if database_url.is_some() => StoreBackend::Postgres,
            None => StoreBackend::Memory,
        };
        if backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::DatabaseUrlMissing);
        }

        let defaults = MutationPolicy::default();
        let policy = MutationPolicy {
            timeout: parse(&var, "STORE_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            max_attempts: parse(&var, "STORE_MAX_ATTEMPTS")?.unwrap_or(defaults.max_attempts),
            retry_backoff: parse(&var, "STORE_RETRY_BACKOFF_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_backoff),
        };

        Ok(Self {
            backend,
            database_url,
            max_connections: parse(&var, "DATABASE_MAX_CONNECTIONS")?.unwrap_or(5),
            policy,
            default_list_title: var("DEFAULT_LIST_TITLE")
                .map(|title| title.trim().to_string())
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| "Shopping".to_string()),
        })
    }
}

fn parse<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        None => Ok(None),
    }
}

/// Opens the configured document store
///
/// For PostgreSQL this connects, applies migrations and starts the change
/// feed listener.
pub async fn init_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn ShoppingListRepository>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; lists are lost on restart");
            Ok(Arc::new(ShoppingListRepositoryMemory::new()))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .clone()
                .ok_or(ConfigError::DatabaseUrlMissing)?;
            let database = DatabaseConfig::new(url).with_max_connections(config.max_connections);
            let pool = create_postgres_pool(&database).await?;
            run_migrations(&pool).await?;
            let repository = Arc::new(ShoppingListRepositoryPostgres::new(pool));
            // Detached: the listener reconnects on its own for the life of the process.
            let _change_feed = repository.spawn_change_listener();
            Ok(repository)
        }
    }
}
