//! SQLite storage implementation for the portfolio aggregator.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `aggregator-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for every domain entity
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! All other crates (`core`, `connect`) are database-agnostic and work with traits.
//!
//! ```text
//! core (domain)          connect (sync)
//!       │                      │
//!       └──────────┬───────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod accounts;
pub mod activities;
pub mod assets;
pub mod portfolio;
pub mod settings;
pub mod sync;

// Re-export database utilities
pub use db::{
    backup_database, create_pool, get_connection, get_db_path, init, restore_database,
    restore_database_safe, run_migrations, write_actor::spawn_writer, DbConnection, DbPool,
    DbTransactionExecutor, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from aggregator-core for convenience
pub use aggregator_core::errors::{DatabaseError, Error, Result};
