//! Router wiring and server startup.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod ownership;
pub mod store;

use crate::shiplog::{auth::TokenService, store::Store};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
}

/// Build the application router.
///
/// Everything nested under `/api` sits behind the auth gate; signup, signin
/// and health are public.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/product",
            get(handlers::product::get_products).post(handlers::product::create_product),
        )
        .route(
            "/product/:id",
            get(handlers::product::get_one_product)
                .put(handlers::product::update_product)
                .delete(handlers::product::delete_product),
        )
        .route(
            "/update",
            get(handlers::update::get_updates).post(handlers::update::create_update),
        )
        .route(
            "/update/:id",
            get(handlers::update::get_one_update)
                .put(handlers::update::update_update)
                .delete(handlers::update::delete_update),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/signup", post(handlers::user::signup))
        .route("/signin", post(handlers::user::signin))
        .nest("/api", protected)
        .merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span)),
        )
        .with_state(state)
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, state: AppState) -> Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
