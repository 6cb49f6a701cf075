use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    routing::{delete, get, post},
    BoxError, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{error::AppError, models::UNOWNED, state::AppState};

pub mod applications;
pub mod documents;
pub mod health;
pub mod users;

pub fn create_router(state: AppState) -> Router<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let request_timeout = state.config.request_timeout();

    let router = Router::new()
        .route(
            "/applications",
            get(applications::list_applications).post(applications::create_application),
        )
        .route("/applications/:id", delete(applications::delete_application))
        .route("/documents", post(documents::create_document))
        .route("/documents/:id", delete(documents::delete_document))
        .route("/store-user", post(users::store_user))
        .route("/health", get(health::health_check))
        .with_state(state);

    let router = match request_timeout {
        Some(timeout) => with_request_timeout(router, timeout),
        None => router,
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}

fn with_request_timeout(router: Router, timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(timeout),
    )
}

async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::new(StatusCode::REQUEST_TIMEOUT, "request timed out")
    } else {
        AppError::internal(err)
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Owner identifier from the `user_id` query parameter. Absent or blank means
/// the unowned sentinel; anything else must be an integer.
pub(crate) fn parse_owner(raw: Option<&str>) -> Option<i32> {
    match raw.map(str::trim) {
        None | Some("") => Some(UNOWNED),
        Some(value) => value.parse().ok(),
    }
}

pub(crate) fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}
