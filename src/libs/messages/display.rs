//! Display implementation for taskdesk messages.
//!
//! Every user-facing string lives here so that the screens, the session and
//! the storage layer share one wording. Messages with dynamic content take
//! their parameters as variant fields.
//!
//! ```rust
//! use taskdesk::libs::messages::Message;
//!
//! assert_eq!(Message::TaskCreated.to_string(), "Task added successfully");
//! assert_eq!(Message::Welcome("Alice".into()).to_string(), "Welcome, Alice!");
//! ```

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated => "Task added successfully".to_string(),
            Message::TaskUpdated => "Task updated successfully".to_string(),
            Message::TaskDeleted => "Task deleted successfully".to_string(),
            Message::TaskNotFoundWithId(id) => format!("Task with ID {} not found.", id),
            Message::TaskCompletionToggled(title, true) => format!("Task '{}' marked as completed.", title),
            Message::TaskCompletionToggled(title, false) => format!("Task '{}' marked as pending.", title),
            Message::TasksCleared(count) => format!("Cleared {} completed task(s).", count),
            Message::NoCompletedTasks => "There are no completed tasks to clear.".to_string(),
            Message::NoTasksFound => "No tasks found.".to_string(),
            Message::TasksHeader(count) => format!("Tasks ({})", count),
            Message::TaskTitleRequired => "Task title is required".to_string(),
            Message::ConfirmDeleteTask(title) => format!("Delete task '{}'? This action cannot be undone.", title),
            Message::ConfirmClearCompleted => {
                "Clear all completed tasks, including any hidden by the current filter? This action cannot be undone.".to_string()
            }
            Message::SearchResults(term, count) => format!("{} task(s) matching '{}'", count, term),
            Message::FilterApplied(filter) => format!("Showing {} tasks", filter),
            Message::FiltersCleared => "Filters cleared, showing all tasks".to_string(),
            Message::InvalidDate(input) => format!("'{}' is not a valid date, expected YYYY-MM-DD", input),

            // === AUTHENTICATION MESSAGES ===
            Message::Welcome(name) => format!("Welcome, {}!", name),
            Message::InvalidCredentials => "Invalid email or password".to_string(),
            Message::MissingCredentials => "Please enter both email and password".to_string(),
            Message::AllFieldsRequired => "All fields are required".to_string(),
            Message::PasswordsDoNotMatch => "Passwords do not match".to_string(),
            Message::PasswordTooShort(min) => format!("Password must be at least {} characters long", min),
            Message::AccountCreated => "Account created successfully! You can now log in.".to_string(),
            Message::RegistrationFailed(error) => format!("Registration failed: {}", error),
            Message::LoginFailed(error) => format!("Login failed: {}", error),
            Message::LoggedOut(name) => format!("Goodbye, {}.", name),
            Message::AccountDeleted(email) => format!("Account {} and all of its tasks were deleted.", email),
            Message::ConfirmDeleteAccount(email) => format!("Delete the account {} together with all tasks and preferences?", email),
            Message::ConfirmDeleteAccountFinal => "This action cannot be undone. Are you REALLY sure?".to_string(),

            // === SETTINGS MESSAGES ===
            Message::SettingsHeader => "Settings".to_string(),
            Message::DefaultPriorityCurrent(priority) => format!("Default task priority: {}", priority),
            Message::PreferenceSaved(key, value) => format!("Preference saved: {} = {}", key, value),
            Message::PreferencesHeader => "Stored preferences:".to_string(),
            Message::NoPreferences => "No preferences stored yet.".to_string(),

            // === DASHBOARD MESSAGES ===
            Message::DashboardHeader(title) => format!("📋 {}", title),
            Message::StatsHeader => "Summary:".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigStatusHeader => "=== Configuration Status ===".to_string(),
            Message::ConfigSaved(path) => format!("Configuration saved to {}", path),
            Message::ConfigModuleDatabase => "Database settings".to_string(),
            Message::ConfigModuleApplication => "Application settings".to_string(),

            // === DATABASE MESSAGES ===
            Message::DatabaseOpened(location) => format!("Database opened at {}", location),
            Message::SchemaRecreated => "Database schema dropped and recreated".to_string(),
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed successfully".to_string(),
            Message::DatabaseVersion(version) => format!("Current database version: {}", version),
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database needs to be updated".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),

            // === GENERAL MESSAGES ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::OperationFailed(error) => error.clone(),

            // === PROMPTS ===
            Message::PromptEmail => "Email".to_string(),
            Message::PromptPassword => "Password".to_string(),
            Message::PromptConfirmPassword => "Confirm password".to_string(),
            Message::PromptDisplayName => "Display name".to_string(),
            Message::PromptTaskTitle => "Task title".to_string(),
            Message::PromptTaskDescription => "Task description".to_string(),
            Message::PromptTaskPriority => "Priority".to_string(),
            Message::PromptTaskDeadline => "Deadline (YYYY-MM-DD, empty for none)".to_string(),
            Message::PromptTaskCompleted => "Completed?".to_string(),
            Message::PromptSearchTerm => "Search (empty to show all)".to_string(),
            Message::PromptSelectAction => "What would you like to do?".to_string(),
            Message::PromptSelectTask => "Select a task".to_string(),
            Message::PromptPriorityFilter => "Filter by priority".to_string(),
            Message::PromptStatusFilter => "Filter by status".to_string(),
            Message::PromptDefaultPriority => "Default priority for new tasks".to_string(),
            Message::PromptDbUrl => "Database URL".to_string(),
            Message::PromptDbDriver => "Database driver".to_string(),
            Message::PromptDbSchema => "Schema auto-update (none/update/create)".to_string(),
            Message::PromptDbPoolSize => "Connection pool size".to_string(),
            Message::PromptShowSql => "Log SQL statements?".to_string(),
            Message::PromptFormatSql => "Format logged SQL?".to_string(),
            Message::PromptAppTitle => "Application title".to_string(),
        };
        write!(f, "{}", text)
    }
}
