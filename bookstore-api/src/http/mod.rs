// Module: http
// HTTP/JSON admin API over the control surface

pub mod admin;
pub mod error;
pub mod health;

use axum::Router;
use bookstore_core::AdminControlSurface;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub control: Arc<AdminControlSurface>,
}

/// Create the HTTP router with all routes
pub fn create_router(control: Arc<AdminControlSurface>) -> Router {
    let state = AppState { control };

    let router = Router::new()
        // Health check endpoints (for monitoring probes)
        .merge(health::create_health_router())
        // Admin endpoints and the inbound push endpoint
        .merge(admin::create_admin_router());

    // Apply layers before state
    let router = router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Apply state to all routes (must be last)
    router.with_state(state)
}
