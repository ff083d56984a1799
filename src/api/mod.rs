//! HTTP API server

use std::any::Any;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    services::ServeFile,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::error::Error;

pub mod handlers;
pub mod response;
pub mod state;

pub use response::{ErrorDetail, ErrorResponse, SuccessResponse};
pub use state::AppState;

/// Build the API router using the provided application state
pub fn create_router(state: AppState) -> Router {
    let request_timeout = state.config.server.write_timeout;
    let test_page = ServeFile::new(&state.test_page);

    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route_service("/test", test_page)
        .nest("/v1", Router::new().route("/ping", get(handlers::ping)))
        .fallback(handlers::not_found)
        .with_state(state);

    // A zero write timeout disables the request deadline
    if !request_timeout.is_zero() {
        router = router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));
    }

    router
        .layer(cors_layer())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// Permissive CORS for local development.
///
/// Preflight requests are answered by `CorsLayer` with 200 rather than 204.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("idempotency-key"),
        ])
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");
    Error::internal("handler panicked").into_response()
}
