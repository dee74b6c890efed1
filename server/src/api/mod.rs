pub mod import;
pub mod ingredients;
pub mod public;
pub mod recipes;
pub mod testing;
pub mod users;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Log a database failure and turn it into a 500.
pub fn internal_error(context: &str, error: impl std::fmt::Display) -> Response {
    tracing::error!("{}: {}", context, error);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, context)
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Go Cookbook API", description = "Recipes, ingredients and unit conversions"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        public::ApiDoc::openapi(),
        testing::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        import::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let spec = openapi();
        for path in [
            "/api/auth/signup",
            "/api/auth/login",
            "/api/test/unauthed-ping",
            "/api/test/ping",
            "/api/recipes",
            "/api/recipes/{id}",
            "/api/recipes/{id}/save",
            "/api/recipes/{id}/review",
            "/api/recipes/{id}/reviews",
            "/api/recipes/saved",
            "/api/recipes/search",
            "/api/ingredients",
            "/api/ingredients/autocomplete",
            "/api/ingredients/{id}",
            "/api/users/me/preferences",
            "/api/users/me/reviews",
            "/api/import/spoonacular",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_openapi_has_bearer_scheme() {
        let spec = openapi();
        let components = spec.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("ErrorResponse"));
    }
}
