//! Authentication service layer
//!
//! Business logic for account creation and login. Both go through the user
//! repository; tokens are signed with the configuration held in app state.

use super::jwt::{generate_access_token, JwtConfig};
use super::password::{hash_password_with_config, verify_password, PasswordConfig};
use crate::error::AppError;
use crate::models::{CreateUserRequest, LoginRequest, TokenResponse, UserRecord};
use crate::repository::UserRepository;
use crate::state::AppState;
use blog_core::BlogError;

/// Authentication service
pub struct AuthService {
    users: UserRepository,
    jwt_config: JwtConfig,
    password_config: PasswordConfig,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.users(),
            jwt_config: state.jwt.clone(),
            password_config: state.password.clone(),
        }
    }

    /// Register a new user
    ///
    /// * `Ok(UserRecord)` - Newly created user
    /// * `Err(AppError::BadRequest)` - Username already taken
    pub async fn register(&self, request: CreateUserRequest) -> Result<UserRecord, AppError> {
        if self.users.find_by_username(&request.username).await?.is_some() {
            return Err(BlogError::DuplicateUsername.into());
        }

        let password_hash = hash_password_with_config(&request.password, &self.password_config)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let user = self.users.create(&request.username, &password_hash).await?;

        tracing::info!(user_id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    /// Login with username and password
    ///
    /// Unknown usernames and wrong passwords both fail with the same
    /// `Invalid credentials` error.
    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, AppError> {
        let user = match self.users.find_by_username(&request.username).await? {
            Some(user) => user,
            None => {
                tracing::warn!(username = %request.username, "login for unknown user");
                return Err(BlogError::InvalidCredentials.into());
            }
        };

        let password_valid = verify_password(&request.password, &user.password)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if !password_valid {
            tracing::warn!(username = %user.username, "login with wrong password");
            return Err(BlogError::InvalidCredentials.into());
        }

        let token = generate_access_token(&self.jwt_config, &user.username)
            .map_err(|e| AppError::Internal(format!("Failed to generate access token: {e}")))?;

        tracing::debug!(username = %user.username, "token issued");
        Ok(TokenResponse { token })
    }
}
