//! Error taxonomy shared by the repository, session and worker layers.
//!
//! Absence of a user, task or preference is never an error: lookups return
//! `Option`. Everything else that can go wrong is one of the variants below.

use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Registration attempted with an email that already has an account.
    #[error("User with email {0} already exists")]
    DuplicateUser(String),

    /// Input rejected before it reached storage.
    #[error("{0}")]
    Validation(String),

    /// A session operation that needs a logged-in user was called without one.
    #[error("No user logged in")]
    NotAuthenticated,

    /// Statement or transaction failure. The transaction has been rolled back.
    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    /// No pooled connection could be opened or checked out in time.
    #[error("{context}: {source}")]
    Pool {
        context: String,
        #[source]
        source: r2d2::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Worker(String),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }

    /// Replaces the generic context of a storage error with an
    /// operation-specific one. Other variants pass through untouched.
    pub fn with_context(self, context: &str) -> Self {
        match self {
            StoreError::Storage { source, .. } => StoreError::Storage {
                context: context.to_string(),
                source,
            },
            StoreError::Pool { source, .. } => StoreError::Pool {
                context: context.to_string(),
                source,
            },
            other => other,
        }
    }

    pub fn is_duplicate_user(&self) -> bool {
        matches!(self, StoreError::DuplicateUser(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(source: rusqlite::Error) -> Self {
        StoreError::Storage {
            context: "Database operation failed".to_string(),
            source,
        }
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(source: r2d2::Error) -> Self {
        StoreError::Pool {
            context: "Connection pool unavailable".to_string(),
            source,
        }
    }
}
