//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use super::LEGACY_BACKEND_HEADER;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/validate-cnic/{cnic}", get(handlers::auth::validate_cnic));

    let citizen_routes = Router::new()
        .route("/register", post(handlers::citizen::register))
        .route("/listings", post(handlers::citizen::create_listing))
        .route("/listings/{citizen_id}", get(handlers::citizen::my_listings))
        .route(
            "/listings/{listing_id}/cancel",
            put(handlers::citizen::cancel_listing),
        )
        .route("/price-estimate", get(handlers::citizen::price_estimate))
        .route(
            "/transactions/{citizen_id}",
            get(handlers::citizen::my_transactions),
        )
        .route("/profile/{citizen_id}", get(handlers::citizen::my_profile))
        .route("/areas", get(handlers::citizen::areas))
        .route("/categories", get(handlers::citizen::categories));

    let operator_routes = Router::new()
        .route("/details/{operator_id}", get(handlers::operator::details))
        .route(
            "/collections/{operator_id}",
            get(handlers::operator::collection_points),
        )
        .route("/collect", post(handlers::operator::collect))
        .route("/deposit", post(handlers::operator::deposit))
        .route("/history/{operator_id}", get(handlers::operator::history))
        .route(
            "/performance/{operator_id}",
            get(handlers::operator::performance),
        )
        .route(
            "/complaints/{operator_id}",
            get(handlers::operator::complaints),
        )
        .route(
            "/complaint/status",
            put(handlers::operator::update_complaint_status),
        );

    let government_routes = Router::new()
        .route("/inventory", get(handlers::government::inventory))
        .route("/warehouses", get(handlers::government::warehouses))
        .route(
            "/reports/high-yield-areas",
            get(handlers::government::high_yield_areas),
        )
        .route(
            "/reports/operator-performance",
            get(handlers::government::operator_performance_report),
        )
        .route(
            "/categories",
            get(handlers::government::categories).post(handlers::government::create_category),
        )
        .route(
            "/categories/{category_id}/price",
            put(handlers::government::update_category_price),
        )
        .route(
            "/categories/{category_id}",
            delete(handlers::government::delete_category),
        )
        .route(
            "/operators",
            get(handlers::government::operators).post(handlers::government::create_operator),
        )
        .route(
            "/operators/{operator_id}/assignment",
            put(handlers::government::assign_operator),
        )
        .route(
            "/operators/{operator_id}/deactivate",
            put(handlers::government::deactivate_operator),
        )
        .route("/complaints", get(handlers::government::complaints))
        .route(
            "/complaint/status",
            put(handlers::government::update_complaint_status),
        )
        .route("/routes", get(handlers::government::routes))
        .route("/areas", get(handlers::government::areas));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/citizen", citizen_routes)
        .nest("/operator", operator_routes)
        .nest("/government", government_routes);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(middleware::from_fn(note_legacy_backend_header))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// The old API let clients pick the ORM or stored-procedure path per request
/// via `X-Use-EF`. Both paths now share one repository, so the header only
/// gets logged.
async fn note_legacy_backend_header(request: Request, next: Next) -> Response {
    if let Some(value) = request.headers().get(LEGACY_BACKEND_HEADER) {
        tracing::debug!(
            header = %String::from_utf8_lossy(value.as_bytes()),
            "ignoring legacy X-Use-EF backend selector"
        );
    }
    next.run(request).await
}
