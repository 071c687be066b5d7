//! # device-catalog-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `DeviceRepository` port defined in `device-catalog-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle and its configuration
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain device variants and the parent/child tables
//!
//! ## Dependency rule
//! Depends on `device-catalog-app` (for port traits) and `device-catalog-domain`
//! (for domain types). The `app` and `domain` crates must never reference this adapter.

pub mod device_repo;
pub mod error;
pub mod pool;

pub use device_repo::SqliteDeviceRepository;
pub use error::StorageError;
pub use pool::{Config, ConfigError, Database};
