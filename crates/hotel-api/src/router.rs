//! Route table

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers;
use crate::middleware::resolve_claims;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/auth/login", post(handlers::auth::login));

    let api_routes = Router::new()
        .route("/api/auth/validate", post(handlers::auth::validate_token))
        .route("/api/tenant/hotels", get(handlers::tenants::list_hotels))
        .route("/api/tenant/hotels/{code}", get(handlers::tenants::get_hotel_by_code))
        .route("/api/tenant/current", get(handlers::tenants::current_tenant))
        .route(
            "/api/tenant/current/connection",
            get(handlers::tenants::current_connection),
        );

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(middleware::from_fn_with_state(state.clone(), resolve_claims))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::permissive()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .with_state(state)
}
