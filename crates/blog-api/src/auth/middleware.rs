//! Authentication middleware for protecting routes
//!
//! Extracts and validates JWT tokens from the Authorization header, then
//! resolves the subject to a stored user. On success the user is added to
//! request extensions.
use super::jwt::{validate_access_token, JwtError};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use blog_core::BlogError;
use std::sync::Arc;
use thiserror::Error;

/// Authenticated user resolved from the token subject
///
/// Handlers extract it with `Extension<AuthenticatedUser>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Stored user id
    pub user_id: i64,
    /// Username carried in the `sub` claim
    pub username: String,
}

/// Authentication middleware errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    #[error("Token subject does not match any user")]
    UnknownSubject,

    #[error("User lookup failed: {0}")]
    Lookup(#[from] BlogError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Lookup(err) = self {
            return crate::error::AppError::from(err).into_response();
        }

        let detail = match self {
            AuthError::MissingAuthHeader => "Not authenticated",
            AuthError::InvalidAuthHeader => "Invalid Authorization header format",
            AuthError::InvalidToken(JwtError::ExpiredToken) => "Token has expired",
            _ => "Could not validate credentials",
        };

        let mut response =
            (StatusCode::UNAUTHORIZED, Json(ApiError::unauthorized(detail))).into_response();
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        response
    }
}

/// Pull the bearer token out of an Authorization header value
///
/// The scheme is matched case-insensitively; an empty token is rejected.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Authentication middleware that requires a valid JWT token
///
/// This middleware:
/// 1. Extracts the Authorization header
/// 2. Validates the Bearer token format
/// 3. Validates the JWT signature, issuer and expiration
/// 4. Looks up the user named by the subject claim
/// 5. Adds AuthenticatedUser to request extensions
///
/// # Usage
///
/// ```ignore
/// use axum::{Router, routing::get, middleware};
/// use blog_api::auth::middleware::auth_middleware;
///
/// let app = Router::new()
///     .route("/protected", get(protected_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
/// ```
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = bearer_token(auth_header).ok_or(AuthError::InvalidAuthHeader)?;

    let claims = validate_access_token(&state.jwt, token).map_err(|e| {
        tracing::warn!(path = %request.uri().path(), reason = %e, "rejected token");
        AuthError::InvalidToken(e)
    })?;

    let user = state
        .users()
        .find_by_username(&claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!(subject = %claims.sub, "token subject not found");
            AuthError::UnknownSubject
        })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
    });

    Ok(next.run(request).await)
}
