//! Application router assembly.
//!
//! The binary (`main.rs`) and the HTTP integration tests build the router
//! through the same [`build_app_router`] function, so both run the identical
//! middleware stack and route tree.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assemble the full application [`Router`]: `/health` at the root,
/// everything else under `/api/v1`, wrapped in (outermost first) panic
/// recovery, timeout, request-id propagation, tracing, request-id stamping,
/// and CORS.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes());

    // Layers run top-down on the request, bottom-up on the response.
    app.layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors_layer(config))
        .with_state(state)
}

/// CORS policy for the configured frontend origins.
///
/// An unparseable origin aborts startup; serving with a half-applied CORS
/// policy would be worse than not starting.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origens: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .map(|origem| {
            origem
                .parse()
                .unwrap_or_else(|e| panic!("Origem CORS inválida '{origem}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origens)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
