//! Persistence layer
//!
//! Each repository owns a clone of the pool and acquires a connection per
//! statement, so nothing is held across an await in the handlers.

pub mod blog;
pub mod user;

pub use blog::BlogRepository;
pub use user::UserRepository;

use blog_core::BlogError;

/// Wrap a driver error with the operation that failed
pub(crate) fn db_error(action: &str) -> impl FnOnce(sqlx::Error) -> BlogError + '_ {
    move |e| BlogError::DatabaseError(format!("Failed to {action}: {e}"))
}

/// Whether the error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// Whether the error is a FOREIGN KEY constraint violation
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}
