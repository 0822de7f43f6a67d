//! User repository for SQLite operations

use super::{db_error, is_unique_violation};
use crate::models::{BlogSummary, UserRecord};
use blog_core::{BlogError, Result};
use sqlx::SqlitePool;

/// User repository
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user with an already hashed password
    ///
    /// A concurrent insert of the same username loses on the UNIQUE
    /// constraint and maps to `DuplicateUsername`.
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<UserRecord> {
        sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (username, password) VALUES (?, ?) RETURNING id, username, password",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                BlogError::DuplicateUsername
            } else {
                db_error("create user")(e)
            }
        })
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch user"))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        sqlx::query_as::<_, UserRecord>("SELECT id, username, password FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch user"))
    }

    /// Blogs owned by a user, oldest first
    pub async fn blogs_of(&self, user_id: i64) -> Result<Vec<BlogSummary>> {
        sqlx::query_as::<_, BlogSummary>(
            "SELECT id, title, body FROM blogs WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("fetch user blogs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use blog_core::DatabaseConfig;

    async fn repo() -> UserRepository {
        UserRepository::new(db::connect(&DatabaseConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let users = repo().await;

        let created = users.create("alice", "hash").await.unwrap();
        assert!(created.id > 0);

        let by_name = users.find_by_username("alice").await.unwrap().unwrap();
        let by_id = users.find_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(by_name.id, created.id);
        assert_eq!(by_id.username, "alice");
        assert!(users.find_by_id(created.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_hits_constraint() {
        let users = repo().await;

        users.create("alice", "hash").await.unwrap();
        let err = users.create("alice", "other").await.unwrap_err();

        assert!(matches!(err, BlogError::DuplicateUsername));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind("alice")
            .fetch_one(&users.pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_missing_user() {
        let users = repo().await;
        assert!(users.find_by_id(42).await.unwrap().is_none());
        assert!(users.find_by_username("ghost").await.unwrap().is_none());
        assert!(users.blogs_of(42).await.unwrap().is_empty());
    }
}
