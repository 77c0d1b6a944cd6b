//! Domain types, session state and the application plumbing around them.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use taskdesk::libs::stats::TaskStats;
//! use taskdesk::libs::task::{Priority, Task};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
//! let tasks = vec![Task::new(1, "File taxes", None, Priority::High, today.pred_opt())];
//! assert_eq!(TaskStats::from_tasks(&tasks, today).overdue, 1);
//! ```

pub mod config;
pub mod data_storage;
pub mod error;
pub mod forms;
pub mod messages;
pub mod search;
pub mod session;
pub mod stats;
pub mod task;
pub mod user;
pub mod view;
pub mod worker;
