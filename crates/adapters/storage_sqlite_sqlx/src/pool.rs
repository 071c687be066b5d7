//! `SQLite` connection pool setup and migration runner.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::error::StorageError;

const ENV_DATABASE_URL: &str = "DEVICE_CATALOG_DATABASE_URL";
const ENV_MAX_CONNECTIONS: &str = "DEVICE_CATALOG_MAX_CONNECTIONS";
const ENV_ACQUIRE_TIMEOUT_MS: &str = "DEVICE_CATALOG_ACQUIRE_TIMEOUT_MS";
const ENV_BUSY_TIMEOUT_MS: &str = "DEVICE_CATALOG_BUSY_TIMEOUT_MS";

/// Configuration for the `SQLite` storage adapter.
#[derive(Debug, Clone)]
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:devices.db` or `sqlite::memory:`).
    pub database_url: String,
    /// Upper bound of pooled connections.
    pub max_connections: u32,
    /// How long a call waits for a pooled connection before failing.
    pub acquire_timeout: Duration,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:devices.db?mode=rwc".to_string(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Default settings for the given database URL.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    /// Private in-memory database, used by tests.
    ///
    /// Limited to a single connection: every pooled connection to a shared
    /// in-memory database would contend on table locks.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            max_connections: 1,
            ..Self::new("sqlite::memory:")
        }
    }

    /// Read configuration from environment variables.
    ///
    /// `DEVICE_CATALOG_DATABASE_URL` is required. `DEVICE_CATALOG_MAX_CONNECTIONS`,
    /// `DEVICE_CATALOG_ACQUIRE_TIMEOUT_MS` and `DEVICE_CATALOG_BUSY_TIMEOUT_MS`
    /// override the defaults when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the URL is missing or an override is not a
    /// valid number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup(ENV_DATABASE_URL).ok_or(ConfigError::Missing {
            key: ENV_DATABASE_URL,
        })?;
        let mut config = Self::new(database_url);

        if let Some(value) = lookup(ENV_MAX_CONNECTIONS) {
            config.max_connections = parse(ENV_MAX_CONNECTIONS, &value)?;
            if config.max_connections == 0 {
                return Err(ConfigError::Invalid {
                    key: ENV_MAX_CONNECTIONS,
                    value,
                });
            }
        }
        if let Some(value) = lookup(ENV_ACQUIRE_TIMEOUT_MS) {
            config.acquire_timeout = Duration::from_millis(parse(ENV_ACQUIRE_TIMEOUT_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout = Duration::from_millis(parse(ENV_BUSY_TIMEOUT_MS, &value)?);
        }
        Ok(config)
    }

    /// Build a [`Database`] from this configuration.
    ///
    /// Creates the connection pool, creates the database file if missing,
    /// and runs all pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or migrations fail.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::initialize(&self).await
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing environment variable {key}")]
    Missing { key: &'static str },
    /// A variable is set to an unusable value.
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Holds the `SQLite` connection pool and provides access to it.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or migrations fail.
    async fn initialize(config: &Config) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::debug!(
            max_connections = config.max_connections,
            "device catalog database ready"
        );

        Ok(Self { pool })
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
