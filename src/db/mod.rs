//! Storage layer for taskdesk.
//!
//! SQLite through `rusqlite`, behind the [`repository::Repository`] trait.
//! [`db::Database`] owns a small connection pool and every transaction
//! boundary; the table modules hold the SQL and row mapping and only ever run
//! inside a transaction handed to them.
//!
//! ```rust
//! use taskdesk::db::{db::Database, repository::Repository};
//!
//! let db = Database::open_in_memory()?;
//! let user = db.register("bob@example.com", "hunter22", "Bob")?;
//! assert!(db.authenticate("bob@example.com", "hunter22")?.is_some());
//! assert!(db.preference(user.id, "defaultTaskPriority")?.is_none());
//! # Ok::<(), taskdesk::libs::error::StoreError>(())
//! ```

/// Database handle, transaction helpers and SQL logging.
pub mod db;

/// Versioned schema migrations and the `migrations` ledger.
pub mod migrations;

/// Blocking connection pool.
pub mod pool;

/// User preferences, one row per user and key.
pub mod preferences;

/// The storage contract and its SQLite implementation.
pub mod repository;

/// Task rows and the per-user listing queries.
pub mod tasks;

/// Accounts, credentials and the cascade delete.
pub mod users;
