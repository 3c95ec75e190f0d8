//! Infrastructure module for storage backends.
//!
//! This module contains the repository trait, its in-memory, `PostgreSQL`
//! and managed REST implementations, and the factory that picks one.

pub mod factory;
pub mod in_memory;
pub mod postgres;
pub mod postgrest;
pub mod repository;

pub use factory::{
    ConfigurationError, FactoryError, RepositoryConfig, RepositoryConfigBuilder, RepositoryFactory,
    StorageMode,
};
pub use in_memory::InMemoryTaskRepository;
pub use postgres::PostgresTaskRepository;
pub use postgrest::PostgrestTaskRepository;
pub use repository::{RepositoryError, TaskRepository};
