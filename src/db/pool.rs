//! SQLite connection pooling on `r2d2`.
//!
//! Every new connection passes through [`PragmaCustomizer`], which sets the
//! busy timeout, WAL journaling and foreign key enforcement.

use crate::libs::error::StoreResult;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

pub type ConnectionPool = Pool<SqliteConnectionManager>;

pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const BUSY_TIMEOUT_MS: u32 = 5_000;
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Where connections point to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A private shared-cache memory database. Its pool never holds more
    /// than one connection.
    Memory,
    File(PathBuf),
}

#[derive(Debug)]
struct PragmaCustomizer {
    busy_timeout_ms: u32,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        // busy_timeout goes first so the WAL switch waits on a locked file
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {};\
             PRAGMA journal_mode = WAL;\
             PRAGMA foreign_keys = ON;",
            self.busy_timeout_ms
        ))?;
        tracing::trace!("pooled connection configured");
        Ok(())
    }
}

/// Builds a pool for `target`. File pools hold up to `max_size` connections,
/// memory pools exactly one.
pub fn open(target: &Target, max_size: u32) -> StoreResult<ConnectionPool> {
    let (manager, max_size) = match target {
        Target::Memory => (SqliteConnectionManager::memory(), 1),
        Target::File(path) => (SqliteConnectionManager::file(path), max_size.max(1)),
    };

    let pool = Pool::builder()
        .max_size(max_size)
        .connection_timeout(CONNECTION_TIMEOUT)
        .connection_customizer(Box::new(PragmaCustomizer {
            busy_timeout_ms: BUSY_TIMEOUT_MS,
        }))
        .build(manager)?;

    tracing::debug!(?target, max_size, "connection pool ready");
    Ok(pool)
}
