//! Blog repository for SQLite operations
//!
//! Reads always join `users` so the creator comes back with the row.

use super::{db_error, is_foreign_key_violation};
use crate::models::{BlogRecord, ShowBlog, UpdateBlogRequest};
use blog_core::{BlogError, Result};
use sqlx::SqlitePool;

const SELECT_WITH_CREATOR: &str = r#"
    SELECT b.id, b.title, b.body, b.user_id, u.username AS creator_username
    FROM blogs b
    JOIN users u ON u.id = b.user_id
"#;

/// Blog repository
#[derive(Debug, Clone)]
pub struct BlogRepository {
    pool: SqlitePool,
}

impl BlogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a blog and return it with its creator
    ///
    /// The creator is checked up front; the foreign key backs this up if
    /// the user disappears in between.
    pub async fn create(&self, title: &str, body: &str, user_id: i64) -> Result<ShowBlog> {
        self.ensure_creator(user_id).await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO blogs (title, body, user_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(title)
        .bind(body)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| creator_error(e, user_id, "create blog"))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| BlogError::DatabaseError(format!("Blog {id} vanished after insert")))
    }

    /// All blogs ordered by id, optionally windowed by `(limit, offset)`
    pub async fn list(&self, window: Option<(i64, i64)>) -> Result<Vec<ShowBlog>> {
        let rows = match window {
            Some((limit, offset)) => {
                let sql = format!("{SELECT_WITH_CREATOR} ORDER BY b.id LIMIT ? OFFSET ?");
                sqlx::query_as::<_, BlogRecord>(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!("{SELECT_WITH_CREATOR} ORDER BY b.id");
                sqlx::query_as::<_, BlogRecord>(&sql)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(db_error("list blogs"))?;

        Ok(rows.into_iter().map(ShowBlog::from).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ShowBlog>> {
        let sql = format!("{SELECT_WITH_CREATOR} WHERE b.id = ?");
        let row = sqlx::query_as::<_, BlogRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("fetch blog"))?;

        Ok(row.map(ShowBlog::from))
    }

    /// Apply the supplied fields; `None` when no row has this id
    pub async fn update(&self, id: i64, changes: &UpdateBlogRequest) -> Result<Option<ShowBlog>> {
        // A missing blog wins over a missing creator
        if let Some(user_id) = changes.user_id {
            if self.find_by_id(id).await?.is_none() {
                return Ok(None);
            }
            self.ensure_creator(user_id).await?;
        }

        let result = sqlx::query(
            r#"
            UPDATE blogs
            SET title = COALESCE(?, title),
                body = COALESCE(?, body),
                user_id = COALESCE(?, user_id)
            WHERE id = ?
            "#,
        )
        .bind(changes.title.as_deref())
        .bind(changes.body.as_deref())
        .bind(changes.user_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| creator_error(e, changes.user_id.unwrap_or_default(), "update blog"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    /// Hard delete; `false` when no row has this id
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete blog"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn ensure_creator(&self, user_id: i64) -> Result<()> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("check creator"))?;

        if count == 0 {
            return Err(BlogError::unknown_creator(user_id));
        }
        Ok(())
    }
}

fn creator_error(err: sqlx::Error, user_id: i64, action: &str) -> BlogError {
    if is_foreign_key_violation(&err) {
        BlogError::unknown_creator(user_id)
    } else {
        db_error(action)(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::repository::UserRepository;
    use blog_core::DatabaseConfig;

    async fn setup() -> (BlogRepository, i64) {
        let pool = db::connect(&DatabaseConfig::in_memory()).await.unwrap();
        let user = UserRepository::new(pool.clone())
            .create("alice", "hash")
            .await
            .unwrap();
        (BlogRepository::new(pool), user.id)
    }

    #[tokio::test]
    async fn test_create_returns_creator() {
        let (blogs, user_id) = setup().await;

        let blog = blogs.create("Hello", "World", user_id).await.unwrap();

        assert_eq!(blog.title, "Hello");
        assert_eq!(blog.creator.id, user_id);
        assert_eq!(blog.creator.username, "alice");
    }

    #[tokio::test]
    async fn test_create_with_unknown_creator() {
        let (blogs, _) = setup().await;

        let err = blogs.create("t", "b", 999).await.unwrap_err();

        assert!(matches!(err, BlogError::ValidationError(_)));
        assert!(blogs.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_window() {
        let (blogs, user_id) = setup().await;
        for i in 0..5 {
            blogs.create(&format!("post {i}"), "b", user_id).await.unwrap();
        }

        assert_eq!(blogs.list(None).await.unwrap().len(), 5);

        let page = blogs.list(Some((2, 2))).await.unwrap();
        let titles: Vec<_> = page.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["post 2", "post 3"]);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (blogs, user_id) = setup().await;
        let blog = blogs.create("old", "body", user_id).await.unwrap();

        let changes = UpdateBlogRequest {
            title: Some("new".to_string()),
            ..Default::default()
        };
        let updated = blogs.update(blog.id, &changes).await.unwrap().unwrap();

        assert_eq!(updated.title, "new");
        assert_eq!(updated.body, "body");
        assert!(blogs.update(blog.id + 100, &changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_to_unknown_creator() {
        let (blogs, user_id) = setup().await;
        let blog = blogs.create("t", "b", user_id).await.unwrap();

        let changes = UpdateBlogRequest {
            user_id: Some(777),
            ..Default::default()
        };
        let err = blogs.update(blog.id, &changes).await.unwrap_err();

        assert!(matches!(err, BlogError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let (blogs, user_id) = setup().await;
        let blog = blogs.create("t", "b", user_id).await.unwrap();

        assert!(blogs.delete(blog.id).await.unwrap());
        assert!(!blogs.delete(blog.id).await.unwrap());
        assert!(blogs.find_by_id(blog.id).await.unwrap().is_none());
    }
}
