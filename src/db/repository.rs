//! The storage contract consumed by the session layer.
//!
//! Each method is blocking and runs in exactly one transaction. Writes, and
//! reads whose outcome decides a write, take an immediate transaction so two
//! processes sharing a database file serialise on the write lock.
//!
//! ```rust
//! use taskdesk::db::{db::Database, repository::Repository};
//! use taskdesk::libs::task::{Priority, Task, TaskFilter};
//!
//! let db = Database::open_in_memory()?;
//! let alice = db.register("alice@example.com", "secret1", "Alice")?;
//! db.save_task(&Task::new(alice.id, "Buy milk", None, Priority::Low, None))?;
//! assert_eq!(db.tasks_for_user(alice.id, TaskFilter::All)?.len(), 1);
//! # Ok::<(), taskdesk::libs::error::StoreError>(())
//! ```

use super::db::Database;
use super::{preferences, tasks, users};
use crate::libs::error::{StoreError, StoreResult};
use crate::libs::messages::Message;
use crate::libs::task::{Task, TaskFilter};
use crate::libs::user::{User, UserPreference};
use chrono::Local;

pub trait Repository: Send + Sync {
    /// Exact email and password match. Refreshes `last_login` on success.
    /// A failed match is `Ok(None)`.
    fn authenticate(&self, email: &str, password: &str) -> StoreResult<Option<User>>;

    /// Creates an account, failing with [`StoreError::DuplicateUser`] when
    /// the email is taken.
    fn register(&self, email: &str, password: &str, display_name: &str) -> StoreResult<User>;

    fn user(&self, user_id: i64) -> StoreResult<Option<User>>;

    /// Deletes the user with all of its tasks and preferences. Unknown ids
    /// are a no-op.
    fn delete_user(&self, user_id: i64) -> StoreResult<()>;

    fn tasks_for_user(&self, user_id: i64, filter: TaskFilter) -> StoreResult<Vec<Task>>;

    fn save_task(&self, task: &Task) -> StoreResult<Task>;

    /// Refreshes `updated_at` and persists every field.
    fn update_task(&self, task: &Task) -> StoreResult<Task>;

    /// Missing ids are a no-op.
    fn delete_task(&self, task_id: i64) -> StoreResult<()>;

    /// Returns how many completed tasks were removed.
    fn clear_completed_tasks(&self, user_id: i64) -> StoreResult<usize>;

    fn preference(&self, user_id: i64, key: &str) -> StoreResult<Option<String>>;

    fn set_preference(&self, user_id: i64, key: &str, value: Option<&str>) -> StoreResult<()>;

    fn preferences(&self, user_id: i64) -> StoreResult<Vec<UserPreference>>;
}

impl Repository for Database {
    fn authenticate(&self, email: &str, password: &str) -> StoreResult<Option<User>> {
        self.write("Failed to authenticate user", |scope| {
            let Some(mut user) = users::find_by_credentials(scope, email, password)? else {
                tracing::debug!(email, "authentication rejected");
                return Ok(None);
            };

            let now = Local::now().naive_local();
            users::touch_last_login(scope, user.id, now)?;
            user.last_login = Some(now);
            tracing::info!(user_id = user.id, "user authenticated");
            Ok(Some(user))
        })
    }

    fn register(&self, email: &str, password: &str, display_name: &str) -> StoreResult<User> {
        self.write("Failed to register user", |scope| {
            if users::email_exists(scope, email)? {
                return Err(StoreError::DuplicateUser(email.to_string()));
            }
            let user = users::insert(scope, email, password, display_name, Local::now().naive_local())?;
            tracing::info!(user_id = user.id, "user registered");
            Ok(user)
        })
    }

    fn user(&self, user_id: i64) -> StoreResult<Option<User>> {
        self.read("Failed to load user", |scope| users::find(scope, user_id))
    }

    fn delete_user(&self, user_id: i64) -> StoreResult<()> {
        self.write("Failed to delete user", |scope| users::delete_cascade(scope, user_id).map(|_| ()))
    }

    fn tasks_for_user(&self, user_id: i64, filter: TaskFilter) -> StoreResult<Vec<Task>> {
        self.read("Failed to load tasks", |scope| tasks::for_user(scope, user_id, filter))
    }

    fn save_task(&self, task: &Task) -> StoreResult<Task> {
        self.write("Failed to save task", |scope| tasks::save(scope, task))
    }

    fn update_task(&self, task: &Task) -> StoreResult<Task> {
        let mut task = task.clone();
        task.touch();
        self.write("Failed to update task", |scope| tasks::save(scope, &task))
    }

    fn delete_task(&self, task_id: i64) -> StoreResult<()> {
        self.write("Failed to delete task", |scope| {
            if tasks::delete(scope, task_id)? == 0 {
                tracing::debug!(task_id, "{}", Message::TaskNotFoundWithId(task_id));
            }
            Ok(())
        })
    }

    fn clear_completed_tasks(&self, user_id: i64) -> StoreResult<usize> {
        self.write("Failed to clear completed tasks", |scope| tasks::delete_completed(scope, user_id))
    }

    fn preference(&self, user_id: i64, key: &str) -> StoreResult<Option<String>> {
        self.read("Failed to load preference", |scope| preferences::value(scope, user_id, key))
    }

    fn set_preference(&self, user_id: i64, key: &str, value: Option<&str>) -> StoreResult<()> {
        if key.trim().is_empty() {
            return Err(StoreError::validation("Preference key is required"));
        }
        self.write("Failed to save preference", |scope| {
            preferences::upsert(scope, user_id, key, value, Local::now().naive_local())
        })
    }

    fn preferences(&self, user_id: i64) -> StoreResult<Vec<UserPreference>> {
        self.read("Failed to load preferences", |scope| preferences::for_user(scope, user_id))
    }
}
