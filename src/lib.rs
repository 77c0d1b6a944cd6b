//! # Taskdesk - personal task management
//!
//! A terminal application where users register, log in and manage their own
//! tasks with priorities, deadlines and a per-user default priority.
//!
//! ## Features
//!
//! - **Accounts**: registration, login and account deletion
//! - **Tasks**: add, edit, complete, delete and clear completed tasks
//! - **Filtering**: by priority, by status, or by free-text search
//! - **Statistics**: totals, pending, high-priority and overdue counters
//! - **Storage**: SQLite with versioned migrations and a connection pool
//!
//! ## Usage
//!
//! ```rust,no_run
//! use taskdesk::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
