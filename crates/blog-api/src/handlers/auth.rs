//! Authentication API handlers
//!
//! Author: hephaex@gmail.com

use crate::auth::AuthService;
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::models::{LoginRequest, TokenResponse};
use crate::state::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// Exchange credentials for a bearer token
///
/// # Responses
///
/// * `200 OK` - Token issued
/// * `400 Bad Request` - Unknown username or wrong password
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Invalid credentials", body = crate::error::ApiError),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = AuthService::new(&state).login(request).await?;
    Ok(Json(token))
}
