//! Request extractors with JSON rejections
//!
//! `ValidatedJson` deserializes the body like `axum::Json`, then runs the
//! `validator` rules declared on the type. `Path` and `Query` wrap the axum
//! extractors of the same name. Every failure becomes a 400 `AppError`
//! with a `detail` message instead of axum's plain-text rejections.

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{
        rejection::{PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Request,
    },
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON body that has passed its validation rules
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::BadRequest(describe(&errors)))?;

        Ok(Self(value))
    }
}

/// Path parameters, rejected as `AppError`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// Query string, rejected as `AppError`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Flatten field errors into one stable, sorted message
pub fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field}: invalid ({})", error.code),
            })
        })
        .collect();

    messages.sort();
    messages.dedup();
    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateUserRequest, ListBlogsQuery};
    use axum::body::Body;
    use axum::http::request::Parts;

    fn parts(uri: &str) -> Parts {
        let (parts, _) = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
            .into_parts();
        parts
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/user")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let ValidatedJson(user) = ValidatedJson::<CreateUserRequest>::from_request(
            json_request(r#"{"username": "alice", "password": "pw"}"#),
            &(),
        )
        .await
        .unwrap();

        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_rule_violation_is_bad_request() {
        let err = ValidatedJson::<CreateUserRequest>::from_request(
            json_request(r#"{"username": "", "password": ""}"#),
            &(),
        )
        .await
        .unwrap_err();

        match err {
            AppError::BadRequest(detail) => {
                assert_eq!(
                    detail,
                    "password must be 1-128 characters; username must be 1-64 characters"
                );
            }
            other => panic!("unexpected rejection: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let err = ValidatedJson::<CreateUserRequest>::from_request(
            json_request(r#"{"username": "alice"}"#),
            &(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let err = ValidatedJson::<CreateUserRequest>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_query_parses_window() {
        let mut parts = parts("/blog?limit=2&page=3");

        let Query(query) = Query::<ListBlogsQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(query.window(), Some((2, 4)));
    }

    #[tokio::test]
    async fn test_bad_query_is_bad_request() {
        let mut parts = parts("/blog?limit=abc");

        let err = Query::<ListBlogsQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        match err {
            AppError::BadRequest(detail) => assert!(detail.contains("invalid digit")),
            other => panic!("unexpected rejection: {other:?}"),
        }
    }
}
