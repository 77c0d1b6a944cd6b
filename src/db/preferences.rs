//! Statements over the `user_preferences` table.
//!
//! The table has no unique constraint on `(user_id, preference_key)`. The
//! upsert below runs inside the caller's immediate transaction and leaves
//! exactly one row per pair, collapsing any duplicates it finds.

use super::db::Scope;
use crate::libs::error::StoreResult;
use crate::libs::user::UserPreference;
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};

const SELECT_PREFERENCE_VALUE: &str = "SELECT preference_value FROM user_preferences
    WHERE user_id = ?1 AND preference_key = ?2 ORDER BY id LIMIT 1";

const SELECT_PREFERENCE_ID: &str = "SELECT id FROM user_preferences
    WHERE user_id = ?1 AND preference_key = ?2 ORDER BY id LIMIT 1";

const SELECT_PREFERENCES: &str = "SELECT id, user_id, preference_key, preference_value, created_at FROM user_preferences
    WHERE user_id = ?1 ORDER BY preference_key, id";

const INSERT_PREFERENCE: &str =
    "INSERT INTO user_preferences (user_id, preference_key, preference_value, created_at) VALUES (?1, ?2, ?3, ?4)";

const UPDATE_PREFERENCE: &str = "UPDATE user_preferences SET preference_value = ?2 WHERE id = ?1";

const DELETE_DUPLICATE_PREFERENCES: &str = "DELETE FROM user_preferences
    WHERE user_id = ?1 AND preference_key = ?2 AND id <> ?3";

fn map_preference(row: &Row<'_>) -> rusqlite::Result<UserPreference> {
    Ok(UserPreference {
        id: row.get(0)?,
        user_id: row.get(1)?,
        key: row.get(2)?,
        value: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Stored value, `None` when there is no row or the value is NULL.
pub fn value(scope: &Scope<'_>, user_id: i64, key: &str) -> StoreResult<Option<String>> {
    let value: Option<Option<String>> = scope
        .query_row(SELECT_PREFERENCE_VALUE, params![user_id, key], |row| row.get(0))
        .optional()?;
    Ok(value.flatten())
}

pub fn upsert(
    scope: &Scope<'_>,
    user_id: i64,
    key: &str,
    value: Option<&str>,
    now: NaiveDateTime,
) -> StoreResult<()> {
    let existing: Option<i64> = scope
        .query_row(SELECT_PREFERENCE_ID, params![user_id, key], |row| row.get(0))
        .optional()?;

    match existing {
        Some(id) => {
            scope.execute(UPDATE_PREFERENCE, params![id, value])?;
            let removed = scope.execute(DELETE_DUPLICATE_PREFERENCES, params![user_id, key, id])?;
            if removed > 0 {
                tracing::warn!(user_id, key, removed, "collapsed duplicate preference rows");
            }
        }
        None => {
            scope.execute(INSERT_PREFERENCE, params![user_id, key, value, now])?;
        }
    }

    Ok(())
}

pub fn for_user(scope: &Scope<'_>, user_id: i64) -> StoreResult<Vec<UserPreference>> {
    let preferences = scope
        .prepare(SELECT_PREFERENCES)?
        .query_map(params![user_id], map_preference)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(preferences)
}
