use super::migrations::{drop_schema, init_with_migrations};
use super::pool::{self, ConnectionPool, PooledConnection, Target};
use crate::libs::config::{DbConfig, SchemaMode};
use crate::libs::error::{StoreError, StoreResult};
use crate::libs::messages::Message;
use crate::msg_debug;
use rusqlite::{CachedStatement, Connection, Params, Row, TransactionBehavior};
use std::path::PathBuf;

const SUPPORTED_DRIVER: &str = "sqlite";
const SCHEMA_CONTEXT: &str = "Failed to prepare the database schema";

/// How executed statements are logged on the `sql` tracing target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlLog {
    Off,
    Plain,
    Formatted,
}

impl SqlLog {
    pub fn from_config(config: &DbConfig) -> Self {
        match (config.show_sql, config.format_sql) {
            (false, _) => SqlLog::Off,
            (true, false) => SqlLog::Plain,
            (true, true) => SqlLog::Formatted,
        }
    }

    fn emit(self, sql: &str) {
        match self {
            SqlLog::Off => {}
            SqlLog::Plain => tracing::debug!(target: "sql", "{}", compact_sql(sql)),
            SqlLog::Formatted => tracing::debug!(target: "sql", "\n{}", format_sql(sql)),
        }
    }
}

/// Collapses all whitespace runs into single spaces.
pub fn compact_sql(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One clause per line, continuation keywords indented.
pub fn format_sql(sql: &str) -> String {
    const CLAUSES: &[&str] = &["FROM", "WHERE", "ORDER", "GROUP", "VALUES", "SET", "LIMIT"];
    const CONTINUATIONS: &[&str] = &["AND", "OR"];

    let mut out = String::new();
    for (i, token) in sql.split_whitespace().enumerate() {
        let upper = token.to_ascii_uppercase();
        if i > 0 && CLAUSES.contains(&upper.as_str()) {
            out.push('\n');
        } else if i > 0 && CONTINUATIONS.contains(&upper.as_str()) {
            out.push_str("\n    ");
        } else if i > 0 {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

/// Turns a `db.url` value into a pool target.
pub fn parse_url(url: &str) -> StoreResult<Target> {
    let url = url.trim();
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);

    match rest {
        "" => Err(StoreError::Config(format!("Database URL '{}' does not name a database", url))),
        ":memory:" => Ok(Target::Memory),
        path => Ok(Target::File(PathBuf::from(path))),
    }
}

/// A statement runner bound to one open transaction.
///
/// Every statement passes through here so that `db.show_sql` sees it.
pub struct Scope<'c> {
    conn: &'c Connection,
    log: SqlLog,
}

impl<'c> Scope<'c> {
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> rusqlite::Result<usize> {
        self.log.emit(sql);
        self.conn.execute(sql, params)
    }

    pub fn query_row<T, P, F>(&self, sql: &str, params: P, f: F) -> rusqlite::Result<T>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.log.emit(sql);
        self.conn.query_row(sql, params, f)
    }

    pub fn prepare(&self, sql: &str) -> rusqlite::Result<CachedStatement<'c>> {
        self.log.emit(sql);
        self.conn.prepare_cached(sql)
    }

    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }
}

/// The SQLite-backed store. Owns the connection pool and every transaction
/// boundary; see `Repository` for the operations.
pub struct Database {
    pool: ConnectionPool,
    sql_log: SqlLog,
    location: String,
}

impl Database {
    /// Opens the database described by `config` and applies its schema mode.
    pub fn open(config: &DbConfig) -> StoreResult<Self> {
        if !config.driver.eq_ignore_ascii_case(SUPPORTED_DRIVER) {
            return Err(StoreError::Config(format!(
                "Unsupported database driver '{}', only '{}' is available",
                config.driver, SUPPORTED_DRIVER
            )));
        }
        if !config.username.is_empty() || !config.password.is_empty() {
            tracing::debug!("SQLite ignores db.username and db.password");
        }

        let target = parse_url(&config.url)?;
        let location = match &target {
            Target::Memory => ":memory:".to_string(),
            Target::File(path) => path.display().to_string(),
        };
        let pool = pool::open(&target, config.pool_size)
            .map_err(|e| e.with_context(&format!("Failed to open database at {}", location)))?;

        let db = Database {
            pool,
            sql_log: SqlLog::from_config(config),
            location,
        };
        db.apply_schema_mode(config.schema)?;

        tracing::info!(location = %db.location, pool_size = db.pool_size(), "database opened");
        msg_debug!(Message::DatabaseOpened(db.location.clone()));
        Ok(db)
    }

    /// Private in-memory database, mostly for tests and tooling.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(&DbConfig::in_memory())
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn pool_size(&self) -> u32 {
        self.pool.max_size()
    }

    /// Raw pooled connection, for schema tooling.
    pub fn connection(&self) -> StoreResult<PooledConnection> {
        Ok(self.pool.get()?)
    }

    fn apply_schema_mode(&self, mode: SchemaMode) -> StoreResult<()> {
        let mut conn = self.pool.get()?;
        let result = match mode {
            SchemaMode::None => Ok(()),
            SchemaMode::Update => init_with_migrations(&mut conn),
            SchemaMode::Create => drop_schema(&mut conn).and_then(|()| init_with_migrations(&mut conn)),
        };
        result.map_err(|e| match e.downcast::<rusqlite::Error>() {
            Ok(source) => StoreError::Storage {
                context: SCHEMA_CONTEXT.to_string(),
                source,
            },
            Err(e) => StoreError::Config(format!("{}: {:#}", SCHEMA_CONTEXT, e)),
        })
    }

    /// Runs `f` inside a deferred (read) transaction.
    pub(crate) fn read<T, F>(&self, context: &str, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Scope<'_>) -> StoreResult<T>,
    {
        self.run(TransactionBehavior::Deferred, context, f)
    }

    /// Runs `f` inside an immediate transaction, which takes the write lock
    /// up front so read-check-write sequences cannot interleave with another
    /// writer.
    pub(crate) fn write<T, F>(&self, context: &str, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Scope<'_>) -> StoreResult<T>,
    {
        self.run(TransactionBehavior::Immediate, context, f)
    }

    fn run<T, F>(&self, behavior: TransactionBehavior, context: &str, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Scope<'_>) -> StoreResult<T>,
    {
        let mut conn = self.pool.get().map_err(|e| StoreError::from(e).with_context(context))?;
        let tx = conn
            .transaction_with_behavior(behavior)
            .map_err(|e| StoreError::from(e).with_context(context))?;

        let result = f(&Scope { conn: &tx, log: self.sql_log });
        match result {
            Ok(value) => {
                tx.commit().map_err(|e| StoreError::from(e).with_context(context))?;
                Ok(value)
            }
            Err(e) => {
                // dropping the transaction rolls it back
                drop(tx);
                tracing::warn!(error = %e, "{}; transaction rolled back", context);
                Err(e.with_context(context))
            }
        }
    }
}
