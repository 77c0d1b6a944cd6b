use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Preference key holding the priority preselected for new tasks.
pub const DEFAULT_PRIORITY_KEY: &str = "defaultTaskPriority";

/// A registered account.
///
/// The password is kept as the opaque string the user typed. It is compared
/// verbatim during authentication and is never written to logs or views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub display_name: String,
    pub created_at: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreference {
    pub id: i64,
    pub user_id: i64,
    pub key: String,
    pub value: Option<String>,
    pub created_at: NaiveDateTime,
}
