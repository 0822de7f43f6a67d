//! Blog Core - Shared error and configuration types
//!
//! This crate holds what the HTTP layer and the binary both need:
//! - The domain error type and result alias
//! - Configuration management (defaults, environment, TOML files)

pub mod config;

pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for blog operations
#[derive(Error, Debug)]
pub enum BlogError {
    #[error("{0}")]
    NotFound(String),

    #[error("Username already used")]
    DuplicateUsername,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl BlogError {
    /// Error for a blog id that has no row
    pub fn blog_not_found(id: i64) -> Self {
        Self::NotFound(format!("Blog with id={id} not found"))
    }

    /// Error for a user id that has no row
    pub fn user_not_found() -> Self {
        Self::NotFound("User not found".to_string())
    }

    /// Error for a blog that points at a user which does not exist
    pub fn unknown_creator(user_id: i64) -> Self {
        Self::ValidationError(format!("User with id={user_id} does not exist"))
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(BlogError::blog_not_found(7).to_string(), "Blog with id=7 not found");
        assert_eq!(BlogError::user_not_found().to_string(), "User not found");
    }

    #[test]
    fn test_unknown_creator_is_validation_error() {
        let err = BlogError::unknown_creator(42);
        assert!(matches!(err, BlogError::ValidationError(_)));
        assert_eq!(err.to_string(), "User with id=42 does not exist");
    }

}
