//! State of one logged-in run: the current user and the task list on screen.
//!
//! The session talks to storage only through the [`Repository`] it was
//! built with. Edits and deletes only touch tasks in the current list and
//! patch that list in place. Clearing completed tasks reloads the full list,
//! since it reaches tasks a filter may be hiding.
//!
//! Reloads are ordered by [`RefreshTicket`]s. Each reload takes the next
//! ticket; when its result arrives it is applied only if no newer reload has
//! started in the meantime.
//!
//! ```rust
//! use std::sync::Arc;
//! use taskdesk::db::db::Database;
//! use taskdesk::libs::forms::{RegistrationForm, TaskForm};
//! use taskdesk::libs::session::Session;
//!
//! let mut session = Session::new(Arc::new(Database::open_in_memory()?));
//! session.register(&RegistrationForm::new("alice@example.com", "Alice", "secret1", "secret1"))?;
//! session.login("alice@example.com", "secret1")?;
//! session.add_task(&TaskForm { title: "Buy milk".into(), ..Default::default() })?;
//! assert_eq!(session.stats().total, 1);
//! # Ok::<(), taskdesk::libs::error::StoreError>(())
//! ```

use super::error::{StoreError, StoreResult};
use super::forms::{LoginForm, RegistrationForm, TaskForm};
use super::search::{filter_tasks, is_blank};
use super::stats::TaskStats;
use super::task::{Priority, Task, TaskFilter};
use super::user::{User, UserPreference, DEFAULT_PRIORITY_KEY};
use super::worker::Worker;
use crate::db::repository::Repository;
use chrono::Local;
use std::sync::Arc;

/// Generation number of a reload request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

pub struct Session {
    repo: Arc<dyn Repository>,
    user: Option<User>,
    tasks: Vec<Task>,
    generation: u64,
}

impl Session {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Session {
            repo,
            user: None,
            tasks: Vec::new(),
            generation: 0,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == Some(task_id))
    }

    fn current_user_id(&self) -> StoreResult<i64> {
        self.user.as_ref().map(|user| user.id).ok_or(StoreError::NotAuthenticated)
    }

    /// Authenticates and, on success, loads every task of the user. Bad
    /// credentials are `Ok(None)`.
    pub fn login(&mut self, email: &str, password: &str) -> StoreResult<Option<User>> {
        let form = LoginForm::new(email, password);
        form.validate()?;

        let Some(user) = self.repo.authenticate(&form.email, &form.password)? else {
            return Ok(None);
        };
        self.user = Some(user.clone());
        self.load(TaskFilter::All)?;
        Ok(Some(user))
    }

    pub fn register(&self, form: &RegistrationForm) -> StoreResult<User> {
        form.validate()?;
        self.repo.register(&form.email, &form.password, &form.display_name)
    }

    /// Forgets the user and the task list. Returns who was logged in.
    pub fn logout(&mut self) -> Option<User> {
        self.tasks.clear();
        self.generation += 1;
        self.user.take()
    }

    /// Starts a reload. Any reload started earlier becomes stale.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        RefreshTicket(self.generation)
    }

    /// Installs `tasks` if `ticket` is still the latest one. Returns whether
    /// the list was replaced.
    pub fn apply_refresh(&mut self, ticket: RefreshTicket, tasks: Vec<Task>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(ticket = ticket.0, latest = self.generation, "discarding stale task reload");
            return false;
        }
        self.tasks = tasks;
        true
    }

    pub fn load(&mut self, filter: TaskFilter) -> StoreResult<&[Task]> {
        let user_id = self.current_user_id()?;
        let ticket = self.begin_refresh();
        let tasks = self.repo.tasks_for_user(user_id, filter)?;
        self.apply_refresh(ticket, tasks);
        Ok(&self.tasks)
    }

    /// Same as [`Session::load`], with the query running on `worker`.
    pub async fn reload_with(&mut self, worker: &Worker, filter: TaskFilter) -> StoreResult<bool> {
        let user_id = self.current_user_id()?;
        let ticket = self.begin_refresh();
        let tasks = worker.run(move |repo| repo.tasks_for_user(user_id, filter)).await?;
        Ok(self.apply_refresh(ticket, tasks))
    }

    /// A blank term reloads the full list from storage. Any other term
    /// re-reads the full list and keeps the matches.
    pub fn search(&mut self, term: &str) -> StoreResult<&[Task]> {
        if is_blank(term) {
            return self.load(TaskFilter::All);
        }

        let user_id = self.current_user_id()?;
        let ticket = self.begin_refresh();
        let tasks = self.repo.tasks_for_user(user_id, TaskFilter::All)?;
        self.apply_refresh(ticket, filter_tasks(&tasks, term));
        Ok(&self.tasks)
    }

    /// Validates and saves a new task, then puts it at the top of the list.
    pub fn add_task(&mut self, form: &TaskForm) -> StoreResult<Task> {
        let user_id = self.current_user_id()?;
        form.validate()?;

        let mut task = Task::new(user_id, form.title(), form.description(), form.priority, form.deadline);
        task.completed = form.completed;
        let saved = self.repo.save_task(&task)?;
        self.tasks.insert(0, saved.clone());
        Ok(saved)
    }

    /// Saves an edited task. `Ok(None)` when the task is not in the current
    /// list or names another owner.
    pub fn update_task(&mut self, task: &Task) -> StoreResult<Option<Task>> {
        let user_id = self.current_user_id()?;
        let listed = task.id.is_some_and(|id| self.task(id).is_some());
        if !listed || task.user_id != user_id {
            tracing::warn!(task_id = ?task.id, "refusing to update a task outside the current list");
            return Ok(None);
        }

        let saved = self.repo.update_task(task)?;
        self.replace_in_list(&saved);
        Ok(Some(saved))
    }

    /// Flips the completion flag of a listed task. `Ok(None)` when the task
    /// is not in the current list.
    pub fn toggle_completion(&mut self, task_id: i64) -> StoreResult<Option<Task>> {
        self.current_user_id()?;
        let Some(mut task) = self.task(task_id).cloned() else {
            return Ok(None);
        };

        task.set_completed(!task.completed);
        let saved = self.repo.update_task(&task)?;
        self.replace_in_list(&saved);
        Ok(Some(saved))
    }

    /// Deletes a listed task. Returns false, touching nothing, when the task
    /// is not in the current list.
    pub fn delete_task(&mut self, task_id: i64) -> StoreResult<bool> {
        self.current_user_id()?;
        if self.task(task_id).is_none() {
            return Ok(false);
        }

        self.repo.delete_task(task_id)?;
        self.tasks.retain(|task| task.id != Some(task_id));
        Ok(true)
    }

    /// Deletes every completed task of the user, listed or not, then reloads
    /// the unfiltered list.
    pub fn clear_completed(&mut self) -> StoreResult<usize> {
        let user_id = self.current_user_id()?;
        let removed = self.repo.clear_completed_tasks(user_id)?;
        self.load(TaskFilter::All)?;
        Ok(removed)
    }

    /// Counters over the tasks currently listed.
    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks, Local::now().date_naive())
    }

    pub fn default_priority(&self) -> StoreResult<Priority> {
        let user_id = self.current_user_id()?;
        let stored = self.repo.preference(user_id, DEFAULT_PRIORITY_KEY)?;

        Ok(match stored {
            None => Priority::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, "ignoring stored default priority: {}", e);
                Priority::default()
            }),
        })
    }

    pub fn set_default_priority(&self, priority: Priority) -> StoreResult<()> {
        let user_id = self.current_user_id()?;
        self.repo.set_preference(user_id, DEFAULT_PRIORITY_KEY, Some(priority.as_str()))
    }

    pub fn preferences(&self) -> StoreResult<Vec<UserPreference>> {
        let user_id = self.current_user_id()?;
        self.repo.preferences(user_id)
    }

    /// Deletes the current user with all of its data and logs out.
    pub fn delete_account(&mut self) -> StoreResult<User> {
        let user_id = self.current_user_id()?;
        self.repo.delete_user(user_id)?;
        self.logout().ok_or(StoreError::NotAuthenticated)
    }

    fn replace_in_list(&mut self, saved: &Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == saved.id) {
            *slot = saved.clone();
        }
    }
}
