//! OpenAPI document, served through Swagger UI at `/docs`.

use crate::shiplog::{
    handlers::{
        product::ProductBody,
        user::{Credentials, TokenResponse},
    },
    models::{Product, Update, UpdateStatus},
    store::{NewUpdate, UpdatePatch},
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::shiplog::handlers::health::health,
        crate::shiplog::handlers::user::signup,
        crate::shiplog::handlers::user::signin,
        crate::shiplog::handlers::product::get_products,
        crate::shiplog::handlers::product::get_one_product,
        crate::shiplog::handlers::product::create_product,
        crate::shiplog::handlers::product::update_product,
        crate::shiplog::handlers::product::delete_product,
        crate::shiplog::handlers::update::get_updates,
        crate::shiplog::handlers::update::get_one_update,
        crate::shiplog::handlers::update::create_update,
        crate::shiplog::handlers::update::update_update,
        crate::shiplog::handlers::update::delete_update,
    ),
    components(schemas(
        Credentials,
        TokenResponse,
        ProductBody,
        Product,
        Update,
        UpdateStatus,
        NewUpdate,
        UpdatePatch,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup and signin"),
        (name = "product", description = "Products owned by the caller"),
        (name = "update", description = "Changelog updates under a product"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/signup"));
        assert!(doc.paths.paths.contains_key("/api/update/{id}"));
        assert!(doc.components.is_some());
    }
}
