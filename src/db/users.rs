//! Statements over the `users` table.
//!
//! Every function runs inside the transaction owned by the caller's
//! [`Scope`]; none of them commit.

use super::db::Scope;
use crate::libs::error::{StoreError, StoreResult};
use crate::libs::user::User;
use chrono::NaiveDateTime;
use rusqlite::{params, ErrorCode, OptionalExtension, Row};

const SELECT_USER_BY_ID: &str =
    "SELECT id, email, password, display_name, created_at, last_login FROM users WHERE id = ?1";

/// Credentials are compared verbatim, as stored.
const SELECT_USER_BY_CREDENTIALS: &str =
    "SELECT id, email, password, display_name, created_at, last_login FROM users WHERE email = ?1 AND password = ?2";

const SELECT_EMAIL_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)";

const INSERT_USER: &str = "INSERT INTO users (email, password, display_name, created_at) VALUES (?1, ?2, ?3, ?4)";

const UPDATE_LAST_LOGIN: &str = "UPDATE users SET last_login = ?2 WHERE id = ?1";

// Children first; there is no ON DELETE CASCADE in the schema.
const DELETE_USER_PREFERENCES: &str = "DELETE FROM user_preferences WHERE user_id = ?1";
const DELETE_USER_TASKS: &str = "DELETE FROM tasks WHERE user_id = ?1";
const DELETE_USER: &str = "DELETE FROM users WHERE id = ?1";

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password: row.get(2)?,
        display_name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        created_at: row.get(4)?,
        last_login: row.get(5)?,
    })
}

pub fn find(scope: &Scope<'_>, user_id: i64) -> StoreResult<Option<User>> {
    Ok(scope.query_row(SELECT_USER_BY_ID, params![user_id], map_user).optional()?)
}

pub fn find_by_credentials(scope: &Scope<'_>, email: &str, password: &str) -> StoreResult<Option<User>> {
    Ok(scope
        .query_row(SELECT_USER_BY_CREDENTIALS, params![email, password], map_user)
        .optional()?)
}

pub fn email_exists(scope: &Scope<'_>, email: &str) -> StoreResult<bool> {
    Ok(scope.query_row(SELECT_EMAIL_EXISTS, params![email], |row| row.get(0))?)
}

pub fn touch_last_login(scope: &Scope<'_>, user_id: i64, at: NaiveDateTime) -> StoreResult<()> {
    scope.execute(UPDATE_LAST_LOGIN, params![user_id, at])?;
    Ok(())
}

/// Inserts a new account. A UNIQUE violation on `email` surfaces as
/// [`StoreError::DuplicateUser`].
pub fn insert(
    scope: &Scope<'_>,
    email: &str,
    password: &str,
    display_name: &str,
    created_at: NaiveDateTime,
) -> StoreResult<User> {
    match scope.execute(INSERT_USER, params![email, password, display_name, created_at]) {
        Ok(_) => {}
        Err(e) if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
            return Err(StoreError::DuplicateUser(email.to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(User {
        id: scope.last_insert_rowid(),
        email: email.to_string(),
        password: password.to_string(),
        display_name: display_name.to_string(),
        created_at,
        last_login: None,
    })
}

/// Removes the user with every task and preference it owns. Returns the
/// number of user rows deleted (0 or 1).
pub fn delete_cascade(scope: &Scope<'_>, user_id: i64) -> StoreResult<usize> {
    let preferences = scope.execute(DELETE_USER_PREFERENCES, params![user_id])?;
    let tasks = scope.execute(DELETE_USER_TASKS, params![user_id])?;
    let users = scope.execute(DELETE_USER, params![user_id])?;

    tracing::debug!(user_id, users, tasks, preferences, "user deleted");
    Ok(users)
}
