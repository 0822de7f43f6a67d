//! OpenAPI documentation
//!
//! Served as JSON at `/openapi.json` with Swagger UI at `/docs`.

use crate::error::ApiError;
use crate::handlers::{auth, blogs, health, users};
use crate::models::{
    BlogSummary, CreateBlogRequest, CreateUserRequest, Creator, LoginRequest, ShowBlog, ShowUser,
    TokenResponse, UpdateBlogRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the bearer token scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /login"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Blog API",
        description = "Blog posts and user accounts behind bearer-token authentication.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    paths(
        blogs::create_blog,
        blogs::list_blogs,
        blogs::get_blog,
        blogs::update_blog,
        blogs::delete_blog,
        users::create_user,
        users::get_user,
        auth::login_handler,
        health::health_check,
        health::readiness_check,
    ),
    components(schemas(
        ApiError,
        BlogSummary,
        CreateBlogRequest,
        CreateUserRequest,
        Creator,
        LoginRequest,
        ShowBlog,
        ShowUser,
        TokenResponse,
        UpdateBlogRequest,
        health::HealthResponse,
        health::ReadinessResponse,
    )),
    tags(
        (name = "Blogs", description = "Blog posts"),
        (name = "Users", description = "User accounts"),
        (name = "Authentication", description = "Token issuance"),
        (name = "Health", description = "Liveness and readiness probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in ["/blog", "/blog/{id}", "/user", "/user/{id}", "/login", "/health"] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_tags_are_title_case() {
        let doc = ApiDoc::openapi();
        let tags: Vec<String> = doc
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.name)
            .collect();

        assert_eq!(tags, vec!["Blogs", "Users", "Authentication", "Health"]);
    }
}
