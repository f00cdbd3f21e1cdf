use crate::handlers::{
    auth::{index, login, login_page, logout},
    dashboard::dashboard,
    documents::{documents_page, upload},
    fleet::{create_vehicle, fleet_page},
    health::health_check,
    hr::{create_hr_record, hr_page},
    trips::{create_trip, trips_page},
};
use crate::schemas::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        // Session
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
        // Pages
        .route("/dashboard", get(dashboard))
        .route("/documents", get(documents_page))
        .route("/fleet", get(fleet_page))
        .route("/trips", get(trips_page))
        .route("/hr", get(hr_page))
        // Form targets
        .route("/upload", post(upload))
        .route("/add_vehicle", post(create_vehicle))
        .route("/add_trip", post(create_trip))
        .route("/add_hr", post(create_hr_record))
        // Health check
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30))),
        )
        .with_state(state)
}
