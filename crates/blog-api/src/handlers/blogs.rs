//! Blog handlers
//!
//! Every route here sits behind the authentication middleware; any
//! authenticated user may read and modify any blog.

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::extract::{Path, Query, ValidatedJson};
use crate::models::{CreateBlogRequest, ListBlogsQuery, ShowBlog, UpdateBlogRequest};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use blog_core::BlogError;
use std::sync::Arc;

/// Create a blog
///
/// The creator is taken from `userId` in the body, not from the token.
///
/// # Responses
///
/// * `201 Created` - Blog stored, returned with its creator
/// * `400 Bad Request` - Invalid body or unknown creator
/// * `401 Unauthorized` - Missing or invalid token
#[utoipa::path(
    post,
    path = "/blog",
    tag = "Blogs",
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Blog created", body = ShowBlog),
        (status = 400, description = "Invalid input", body = crate::error::ApiError),
        (status = 401, description = "Not authenticated", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateBlogRequest>,
) -> Result<impl IntoResponse, AppError> {
    let blog = state
        .blogs()
        .create(&request.title, &request.body, request.user_id)
        .await?;

    tracing::info!(blog_id = blog.id, by = %user.username, "blog created");
    Ok((StatusCode::CREATED, Json(blog)))
}

/// List blogs in insertion order
#[utoipa::path(
    get,
    path = "/blog",
    tag = "Blogs",
    params(ListBlogsQuery),
    responses(
        (status = 200, description = "All blogs", body = Vec<ShowBlog>),
        (status = 401, description = "Not authenticated", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_blogs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListBlogsQuery>,
) -> Result<Json<Vec<ShowBlog>>, AppError> {
    let blogs = state.blogs().list(query.window()).await?;
    Ok(Json(blogs))
}

#[utoipa::path(
    get,
    path = "/blog/{id}",
    tag = "Blogs",
    params(("id" = i64, Path, description = "Blog id")),
    responses(
        (status = 200, description = "Blog found", body = ShowBlog),
        (status = 401, description = "Not authenticated", body = crate::error::ApiError),
        (status = 404, description = "Blog not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ShowBlog>, AppError> {
    state
        .blogs()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| BlogError::blog_not_found(id).into())
}

/// Partially update a blog
///
/// Absent fields keep their stored value. An empty body is a no-op that
/// still returns the blog.
#[utoipa::path(
    patch,
    path = "/blog/{id}",
    tag = "Blogs",
    params(("id" = i64, Path, description = "Blog id")),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Blog updated", body = ShowBlog),
        (status = 400, description = "Invalid input", body = crate::error::ApiError),
        (status = 401, description = "Not authenticated", body = crate::error::ApiError),
        (status = 404, description = "Blog not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    ValidatedJson(changes): ValidatedJson<UpdateBlogRequest>,
) -> Result<Json<ShowBlog>, AppError> {
    let blog = state
        .blogs()
        .update(id, &changes)
        .await?
        .ok_or_else(|| AppError::from(BlogError::blog_not_found(id)))?;

    if !changes.is_empty() {
        tracing::info!(blog_id = id, by = %user.username, "blog updated");
    }
    Ok(Json(blog))
}

#[utoipa::path(
    delete,
    path = "/blog/{id}",
    tag = "Blogs",
    params(("id" = i64, Path, description = "Blog id")),
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 401, description = "Not authenticated", body = crate::error::ApiError),
        (status = 404, description = "Blog not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.blogs().delete(id).await? {
        return Err(BlogError::blog_not_found(id).into());
    }

    tracing::info!(blog_id = id, by = %user.username, "blog deleted");
    Ok(StatusCode::NO_CONTENT)
}
