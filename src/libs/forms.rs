//! Plain request structures collected by the screens.
//!
//! Each form validates itself before anything is sent to storage. The
//! repository never sees these types.

use super::error::{StoreError, StoreResult};
use super::messages::Message;
use super::task::{Priority, Task};
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: &str, password: &str) -> Self {
        LoginForm {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(StoreError::validation(Message::MissingCredentials.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn new(email: &str, display_name: &str, password: &str, confirm_password: &str) -> Self {
        RegistrationForm {
            email: email.trim().to_string(),
            display_name: display_name.trim().to_string(),
            password: password.to_string(),
            confirm_password: confirm_password.to_string(),
        }
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.email.is_empty() || self.display_name.is_empty() || self.password.is_empty() {
            return Err(StoreError::validation(Message::AllFieldsRequired.to_string()));
        }
        if self.password != self.confirm_password {
            return Err(StoreError::validation(Message::PasswordsDoNotMatch.to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(StoreError::validation(Message::PasswordTooShort(MIN_PASSWORD_LEN).to_string()));
        }
        Ok(())
    }
}

/// Values entered in the add/edit task dialog.
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
    pub completed: bool,
}

impl TaskForm {
    /// Prefilled values for editing `task`.
    pub fn from_task(task: &Task) -> Self {
        TaskForm {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
            deadline: task.deadline,
            completed: task.completed,
        }
    }

    /// Copies the entered values onto `task`. Identity and timestamps are
    /// left alone.
    pub fn apply_to(&self, task: &mut Task) {
        task.title = self.title().to_string();
        task.description = self.description().map(str::to_string);
        task.priority = self.priority;
        task.deadline = self.deadline;
        task.completed = self.completed;
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.title.trim().is_empty() {
            return Err(StoreError::validation(Message::TaskTitleRequired.to_string()));
        }
        Ok(())
    }

    pub fn title(&self) -> &str {
        self.title.trim()
    }

    /// Trimmed description, `None` when nothing was entered.
    pub fn description(&self) -> Option<&str> {
        Some(self.description.trim()).filter(|d| !d.is_empty())
    }
}

/// Parses a deadline typed as `YYYY-MM-DD`. Blank input means no deadline.
pub fn parse_deadline(raw: &str) -> Result<Option<NaiveDate>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| Message::InvalidDate(raw.to_string()).to_string())
}

/// Inverse of [`parse_deadline`], for prefilling prompts.
pub fn deadline_input(deadline: Option<NaiveDate>) -> String {
    deadline.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}
