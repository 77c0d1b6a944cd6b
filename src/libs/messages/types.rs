#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    TaskNotFoundWithId(i64),
    TaskCompletionToggled(String, bool), // title, completed
    TasksCleared(usize),
    NoCompletedTasks,
    NoTasksFound,
    TasksHeader(usize),
    TaskTitleRequired,
    ConfirmDeleteTask(String),
    ConfirmClearCompleted,
    SearchResults(String, usize), // term, matches
    FilterApplied(String),
    FiltersCleared,
    InvalidDate(String),

    // === AUTHENTICATION MESSAGES ===
    Welcome(String), // display name
    InvalidCredentials,
    MissingCredentials,
    AllFieldsRequired,
    PasswordsDoNotMatch,
    PasswordTooShort(usize),
    AccountCreated,
    RegistrationFailed(String),
    LoginFailed(String),
    LoggedOut(String),
    AccountDeleted(String),
    ConfirmDeleteAccount(String),
    ConfirmDeleteAccountFinal,

    // === SETTINGS MESSAGES ===
    SettingsHeader,
    DefaultPriorityCurrent(String),
    PreferenceSaved(String, String), // key, value
    PreferencesHeader,
    NoPreferences,

    // === DASHBOARD MESSAGES ===
    DashboardHeader(String), // app title
    StatsHeader,

    // === CONFIGURATION MESSAGES ===
    ConfigStatusHeader,
    ConfigSaved(String), // path
    ConfigModuleDatabase,
    ConfigModuleApplication,

    // === DATABASE MESSAGES ===
    DatabaseOpened(String),
    SchemaRecreated,
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationCompleted(u32),       // version
    MigrationFailed(u32, String),  // version, error
    AllMigrationsCompleted,
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,

    // === GENERAL MESSAGES ===
    OperationCancelled,
    OperationFailed(String),

    // === PROMPTS ===
    PromptEmail,
    PromptPassword,
    PromptConfirmPassword,
    PromptDisplayName,
    PromptTaskTitle,
    PromptTaskDescription,
    PromptTaskPriority,
    PromptTaskDeadline,
    PromptTaskCompleted,
    PromptSearchTerm,
    PromptSelectAction,
    PromptSelectTask,
    PromptPriorityFilter,
    PromptStatusFilter,
    PromptDefaultPriority,
    PromptDbUrl,
    PromptDbDriver,
    PromptDbSchema,
    PromptDbPoolSize,
    PromptShowSql,
    PromptFormatSql,
    PromptAppTitle,
}
