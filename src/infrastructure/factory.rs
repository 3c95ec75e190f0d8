//! Repository factory for runtime backend selection.
//!
//! This module picks the storage backend from environment configuration
//! and builds the matching `TaskRepository`.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `in_memory` (default) | `postgres` | `postgrest`
//! - `DATABASE_URL`: `PostgreSQL` connection URL (required when `STORAGE_MODE=postgres`)
//! - `POSTGREST_URL`: managed storage endpoint (required when `STORAGE_MODE=postgrest`)
//! - `POSTGREST_API_KEY`: managed storage API key (required when `STORAGE_MODE=postgrest`)
//!
//! # Example
//!
//! ```ignore
//! let config = RepositoryConfig::from_env()?;
//! let factory = RepositoryFactory::new(config);
//! let task_repository = factory.create().await?;
//! ```

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use super::{
    InMemoryTaskRepository, PostgresTaskRepository, PostgrestTaskRepository, TaskRepository,
};

// =============================================================================
// Configuration Types
// =============================================================================

/// Storage backend for the task table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// In-process storage, lost on restart.
    #[default]
    InMemory,
    /// Direct `PostgreSQL` connection.
    Postgres,
    /// Managed storage reached through its REST interface.
    Postgrest,
}

impl FromStr for StorageMode {
    type Err = ConfigurationError;

    /// Parses a storage mode from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidStorageMode` if the string is not recognized.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "postgrest" | "rest" | "managed" => Ok(Self::Postgrest),
            _ => Err(ConfigurationError::InvalidStorageMode(value.to_string())),
        }
    }
}

/// Configuration for the repository factory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Storage backend.
    pub storage_mode: StorageMode,
    /// `PostgreSQL` connection URL (required when `storage_mode` is `Postgres`).
    pub database_url: Option<String>,
    /// Managed storage endpoint URL (required when `storage_mode` is `Postgrest`).
    pub postgrest_url: Option<String>,
    /// Managed storage API key (required when `storage_mode` is `Postgrest`).
    pub postgrest_api_key: Option<String>,
}

/// Looks up a variable, treating empty/whitespace-only values as unset.
fn non_empty_var(
    lookup: &impl Fn(&str) -> Result<String, env::VarError>,
    name: &str,
) -> Option<String> {
    lookup(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl RepositoryConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> RepositoryConfigBuilder {
        RepositoryConfigBuilder::default()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if:
    /// - `STORAGE_MODE` contains an invalid value
    /// - a URL or key required by the selected mode is missing
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| env::var(name))
    }

    /// Creates a configuration from an arbitrary variable lookup.
    ///
    /// `lookup` has the shape of [`std::env::var`]. Empty or
    /// whitespace-only values count as unset.
    ///
    /// # Errors
    ///
    /// Same as [`RepositoryConfig::from_env`].
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Result<String, env::VarError>,
    ) -> Result<Self, ConfigurationError> {
        let storage_mode = match lookup("STORAGE_MODE") {
            Ok(value) if value.trim().is_empty() => StorageMode::default(),
            Ok(value) => value.trim().parse()?,
            Err(env::VarError::NotPresent) => StorageMode::default(),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigurationError::InvalidStorageMode(
                    "<non-UTF-8 value>".to_string(),
                ));
            }
        };

        let config = Self {
            storage_mode,
            database_url: non_empty_var(&lookup, "DATABASE_URL"),
            postgrest_url: non_empty_var(&lookup, "POSTGREST_URL"),
            postgrest_api_key: non_empty_var(&lookup, "POSTGREST_API_KEY"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if settings required by the selected mode are missing.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self.storage_mode {
            StorageMode::InMemory => Ok(()),
            StorageMode::Postgres if self.database_url.is_none() => {
                Err(ConfigurationError::MissingDatabaseUrl)
            }
            StorageMode::Postgres => Ok(()),
            StorageMode::Postgrest if self.postgrest_url.is_none() => {
                Err(ConfigurationError::MissingPostgrestUrl)
            }
            StorageMode::Postgrest if self.postgrest_api_key.is_none() => {
                Err(ConfigurationError::MissingPostgrestApiKey)
            }
            StorageMode::Postgrest => Ok(()),
        }
    }
}

/// Builder for `RepositoryConfig`.
///
/// # Example
///
/// ```ignore
/// let config = RepositoryConfig::builder()
///     .storage_mode(StorageMode::Postgrest)
///     .postgrest_url("https://project.example.co")
///     .postgrest_api_key("anon-key")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RepositoryConfigBuilder {
    storage_mode: StorageMode,
    database_url: Option<String>,
    postgrest_url: Option<String>,
    postgrest_api_key: Option<String>,
}

impl RepositoryConfigBuilder {
    /// Sets the storage mode.
    #[must_use]
    pub const fn storage_mode(mut self, mode: StorageMode) -> Self {
        self.storage_mode = mode;
        self
    }

    /// Sets the `PostgreSQL` database URL.
    #[must_use]
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Sets the managed storage endpoint URL.
    #[must_use]
    pub fn postgrest_url(mut self, url: impl Into<String>) -> Self {
        self.postgrest_url = Some(url.into());
        self
    }

    /// Sets the managed storage API key.
    #[must_use]
    pub fn postgrest_api_key(mut self, key: impl Into<String>) -> Self {
        self.postgrest_api_key = Some(key.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the configuration is invalid.
    pub fn build(self) -> Result<RepositoryConfig, ConfigurationError> {
        let config = RepositoryConfig {
            storage_mode: self.storage_mode,
            database_url: self.database_url,
            postgrest_url: self.postgrest_url,
            postgrest_api_key: self.postgrest_api_key,
        };

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during factory configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Invalid storage mode value.
    #[error("Invalid storage mode: '{0}'. Expected 'in_memory', 'postgres' or 'postgrest'")]
    InvalidStorageMode(String),

    /// Missing `DATABASE_URL` when storage mode is Postgres.
    #[error("DATABASE_URL environment variable is required when STORAGE_MODE=postgres")]
    MissingDatabaseUrl,

    /// Missing `POSTGREST_URL` when storage mode is Postgrest.
    #[error("POSTGREST_URL environment variable is required when STORAGE_MODE=postgrest")]
    MissingPostgrestUrl,

    /// Missing `POSTGREST_API_KEY` when storage mode is Postgrest.
    #[error("POSTGREST_API_KEY environment variable is required when STORAGE_MODE=postgrest")]
    MissingPostgrestApiKey,
}

/// Errors that can occur during factory initialization.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    DatabaseConnection(String),
}

// =============================================================================
// Repository Factory
// =============================================================================

/// Factory for creating the task repository based on configuration.
#[derive(Debug, Clone)]
pub struct RepositoryFactory {
    config: RepositoryConfig,
}

impl RepositoryFactory {
    /// Creates a new repository factory with the given configuration.
    #[must_use]
    pub const fn new(config: RepositoryConfig) -> Self {
        Self { config }
    }

    /// Creates a new repository factory from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError::Configuration` if environment configuration is invalid.
    pub fn from_env() -> Result<Self, FactoryError> {
        let config = RepositoryConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Returns the configuration used by this factory.
    #[must_use]
    pub const fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Creates the task repository for the configured storage mode.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError` if the configuration is incomplete or the
    /// database connection fails.
    pub async fn create(&self) -> Result<Arc<dyn TaskRepository>, FactoryError> {
        match self.config.storage_mode {
            StorageMode::InMemory => Ok(Arc::new(InMemoryTaskRepository::new())),
            StorageMode::Postgres => {
                let pool = self.create_postgres_pool().await?;
                Ok(Arc::new(PostgresTaskRepository::new(pool)))
            }
            StorageMode::Postgrest => {
                let url = self
                    .config
                    .postgrest_url
                    .as_ref()
                    .ok_or(ConfigurationError::MissingPostgrestUrl)?;
                let api_key = self
                    .config
                    .postgrest_api_key
                    .as_ref()
                    .ok_or(ConfigurationError::MissingPostgrestApiKey)?;
                Ok(Arc::new(PostgrestTaskRepository::new(url, api_key.clone())))
            }
        }
    }

    /// Creates a `PostgreSQL` connection pool.
    async fn create_postgres_pool(&self) -> Result<PgPool, FactoryError> {
        let database_url = self
            .config
            .database_url
            .as_ref()
            .ok_or(ConfigurationError::MissingDatabaseUrl)?;

        PgPool::connect(database_url)
            .await
            .map_err(|error| FactoryError::DatabaseConnection(error.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
