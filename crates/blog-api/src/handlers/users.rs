//! User handlers

use crate::auth::AuthService;
use crate::error::AppError;
use crate::extract::{Path, ValidatedJson};
use crate::models::{CreateUserRequest, ShowUser};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use blog_core::BlogError;
use std::sync::Arc;

/// Register a new user
///
/// # Responses
///
/// * `201 Created` - User stored; the password hash is never returned
/// * `400 Bad Request` - Invalid body or username already used
#[utoipa::path(
    post,
    path = "/user",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ShowUser),
        (status = 400, description = "Invalid input or username taken", body = crate::error::ApiError),
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthService::new(&state).register(request).await?;

    let response = ShowUser {
        id: user.id,
        username: user.username,
        blogs: Vec::new(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Fetch a user with the blogs they created
#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = ShowUser),
        (status = 401, description = "Not authenticated", body = crate::error::ApiError),
        (status = 404, description = "User not found", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ShowUser>, AppError> {
    let users = state.users();
    let user = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::from(BlogError::user_not_found()))?;
    let blogs = users.blogs_of(user.id).await?;

    Ok(Json(ShowUser {
        id: user.id,
        username: user.username,
        blogs,
    }))
}
