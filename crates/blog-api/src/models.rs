//! Request and response schemas plus database row types
//!
//! Rows map to the `users` and `blogs` tables. Response types never carry
//! the password hash; nested data (a blog's creator, a user's blogs) comes
//! from explicit join queries in the repository layer.

use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// ============================================================================
// Database rows
// ============================================================================

/// Row from the `users` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    /// Argon2id PHC hash
    pub password: String,
}

/// Row from `blogs` joined with its creator
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogRecord {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub user_id: i64,
    pub creator_username: String,
}

// ============================================================================
// Requests
// ============================================================================

/// Create blog request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBlogRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    #[schema(example = "Hello")]
    pub title: String,

    #[validate(length(min = 1, message = "body must not be empty"))]
    #[schema(example = "First post")]
    pub body: String,

    /// Id of the creating user; a JSON number or numeric string
    #[serde(rename = "userId", deserialize_with = "deserialize_id")]
    #[validate(range(min = 1, message = "userId must be a positive integer"))]
    #[schema(example = 1)]
    pub user_id: i64,
}

/// Partial blog update; omitted fields keep their current value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBlogRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "body must not be empty"))]
    pub body: Option<String>,

    #[serde(rename = "userId", default, deserialize_with = "deserialize_optional_id")]
    #[validate(range(min = 1, message = "userId must be a positive integer"))]
    pub user_id: Option<i64>,
}

impl UpdateBlogRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.user_id.is_none()
    }
}

/// Create user request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 64, message = "username must be 1-64 characters"))]
    #[schema(example = "alice")]
    pub username: String,

    #[validate(length(min = 1, max = 128, message = "password must be 1-128 characters"))]
    #[schema(example = "s3cret")]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Query parameters for blog listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBlogsQuery {
    /// Maximum rows to return; all rows when absent
    pub limit: Option<u32>,

    /// Page number (1-indexed), only meaningful with `limit`
    #[param(default = 1)]
    pub page: Option<u32>,
}

impl ListBlogsQuery {
    /// `(limit, offset)` window, if a limit was requested
    ///
    /// The offset saturates at `i64::MAX`, which reads past the last row.
    pub fn window(&self) -> Option<(i64, i64)> {
        let limit = i64::from(self.limit?);
        let page = i64::from(self.page.unwrap_or(1).max(1));
        Some((limit, (page - 1).saturating_mul(limit)))
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Creator embedded in a blog response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Creator {
    pub id: i64,
    pub username: String,
}

/// Blog with its creator
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShowBlog {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub creator: Creator,
}

impl From<BlogRecord> for ShowBlog {
    fn from(row: BlogRecord) -> Self {
        Self {
            id: row.id,
            title: row.title,
            body: row.body,
            creator: Creator {
                id: row.user_id,
                username: row.creator_username,
            },
        }
    }
}

/// Blog as listed under its creator
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct BlogSummary {
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// User profile without credentials
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShowUser {
    pub id: i64,
    pub username: String,
    pub blogs: Vec<BlogSummary>,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed bearer token
    pub token: String,
}

// ============================================================================
// Id deserialization
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

impl RawId {
    fn into_id<E: de::Error>(self) -> Result<i64, E> {
        match self {
            RawId::Int(id) => Ok(id),
            RawId::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("userId must be an integer, got {text:?}"))),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer)?.into_id()
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer)?
        .map(RawId::into_id::<D::Error>)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_id_accepts_number_and_string() {
        let numeric: CreateBlogRequest =
            serde_json::from_value(json!({"title": "t", "body": "b", "userId": 4})).unwrap();
        let text: CreateBlogRequest =
            serde_json::from_value(json!({"title": "t", "body": "b", "userId": " 4"})).unwrap();

        assert_eq!(numeric.user_id, 4);
        assert_eq!(text.user_id, 4);
    }

    #[test]
    fn test_user_id_rejects_garbage() {
        let result = serde_json::from_value::<CreateBlogRequest>(
            json!({"title": "t", "body": "b", "userId": "four"}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_create_blog_validation() {
        let request: CreateBlogRequest =
            serde_json::from_value(json!({"title": "", "body": "b", "userId": 0})).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("user_id"));
        assert!(!fields.contains_key("body"));
    }

    #[test]
    fn test_partial_update_parses_subset() {
        let update: UpdateBlogRequest = serde_json::from_value(json!({"body": "new"})).unwrap();

        assert_eq!(update.body.as_deref(), Some("new"));
        assert!(update.title.is_none());
        assert!(update.user_id.is_none());
        assert!(!update.is_empty());
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_partial_update_validates_present_fields() {
        let update: UpdateBlogRequest =
            serde_json::from_value(json!({"title": "", "userId": "2"})).unwrap();

        assert_eq!(update.user_id, Some(2));
        assert!(update.validate().is_err());
        assert!(UpdateBlogRequest::default().is_empty());
    }

    #[test]
    fn test_list_window() {
        assert_eq!(ListBlogsQuery::default().window(), None);

        let query = ListBlogsQuery {
            limit: Some(10),
            page: Some(3),
        };
        assert_eq!(query.window(), Some((10, 20)));

        let first = ListBlogsQuery {
            limit: Some(5),
            page: Some(0),
        };
        assert_eq!(first.window(), Some((5, 0)));
    }

    #[test]
    fn test_list_window_saturates_offset() {
        let query = ListBlogsQuery {
            limit: Some(u32::MAX),
            page: Some(u32::MAX),
        };

        assert_eq!(query.window(), Some((i64::from(u32::MAX), i64::MAX)));
    }

    #[test]
    fn test_show_blog_from_record() {
        let blog = ShowBlog::from(BlogRecord {
            id: 9,
            title: "t".to_string(),
            body: "b".to_string(),
            user_id: 2,
            creator_username: "alice".to_string(),
        });

        let json = serde_json::to_value(&blog).unwrap();
        assert_eq!(json["creator"]["username"], "alice");
        assert_eq!(json["creator"]["id"], 2);
    }
}
