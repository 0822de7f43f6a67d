//! JWT token generation and validation
//!
//! Implements JWT-based authentication with HMAC-SHA256 signing.
//! Access tokens carry the username as subject and expire after a
//! configurable number of minutes.

use blog_core::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Lifetime used when no positive expiry is configured
pub const FALLBACK_EXPIRATION_SECS: u64 = 15 * 60;

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Subject - username
    pub sub: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
}

/// JWT token generation and validation errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token has no subject")]
    MissingSubject,

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// JWT Configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,
    /// Access token expiration time in seconds
    pub access_expiration_secs: u64,
    /// Token issuer identifier
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for JwtConfig {
    fn from(config: &AuthConfig) -> Self {
        let access_expiration_secs = match config.token_expiration_minutes {
            0 => FALLBACK_EXPIRATION_SECS,
            minutes => minutes.saturating_mul(60),
        };

        Self {
            secret: config.jwt_secret.clone(),
            access_expiration_secs,
            issuer: config.issuer.clone(),
        }
    }
}

fn now_secs() -> Result<u64, JwtError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

/// Generate a JWT access token for an authenticated user
///
/// # Example
///
/// ```no_run
/// use blog_api::auth::jwt::{generate_access_token, JwtConfig};
///
/// let config = JwtConfig::default();
/// let token = generate_access_token(&config, "alice").expect("Failed to generate token");
/// ```
pub fn generate_access_token(config: &JwtConfig, username: &str) -> Result<String, JwtError> {
    let now = now_secs()?;

    let claims = Claims {
        iss: config.issuer.clone(),
        sub: username.to_string(),
        iat: now,
        exp: now + config.access_expiration_secs,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a JWT access token and extract claims
///
/// Fails on a bad signature, a foreign issuer, an expired token, or an
/// empty subject.
pub fn validate_access_token(config: &JwtConfig, token: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::InvalidToken,
    })?;

    if token_data.claims.sub.is_empty() {
        return Err(JwtError::MissingSubject);
    }

    Ok(token_data.claims)
}
