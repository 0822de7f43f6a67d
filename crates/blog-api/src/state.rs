//! Application state management
//!
//! Author: hephaex@gmail.com

use crate::auth::{JwtConfig, PasswordConfig};
use crate::repository::{BlogRepository, UserRepository};
use blog_core::AppConfig;
use sqlx::SqlitePool;
use std::time::Instant;

/// Application state shared across handlers
///
/// Built once at startup; the pool is the only shared resource and hands
/// out one connection per query.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Database connection pool
    pub db: SqlitePool,
    /// Token signing settings derived from `config.auth`
    pub jwt: JwtConfig,
    /// Argon2 parameters for new password hashes
    pub password: PasswordConfig,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state with config and an open pool
    pub fn new(config: AppConfig, db: SqlitePool) -> Self {
        let jwt = JwtConfig::from(&config.auth);
        Self {
            config,
            db,
            jwt,
            password: PasswordConfig::default(),
            start_time: Instant::now(),
        }
    }

    /// Replace the password hashing parameters
    pub fn with_password_config(mut self, password: PasswordConfig) -> Self {
        self.password = password;
        self
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    pub fn blogs(&self) -> BlogRepository {
        BlogRepository::new(self.db.clone())
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
