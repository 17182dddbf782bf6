//! Authentication gate and page routing for a health and wellness web app.
//!
//! One route table classifies every path as ignored, public or protected.
//! The request gate enforces it before handlers run, and the page guard
//! re-checks auth state each time a protected page renders.

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod routes;

pub use config::Config;
pub use error::AppError;
pub use guard::RouteGuard;
pub use handlers::http::AppState;
pub use middleware::Gate;
pub use routes::{RouteClass, RouteTable};

use axum::routing::{get, post};
use handlers::{http, pages as page_handlers};
use tower_http::trace::TraceLayer;

/// Build the router: pages and API behind the gate, health outside it.
/// Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let api_routes = axum::Router::new()
        .route("/webhooks/:provider", post(http::webhook))
        .route("/me", get(http::me));

    axum::Router::new()
        .route("/", get(page_handlers::landing))
        .route("/login", get(page_handlers::login))
        .route("/signup", get(page_handlers::signup))
        .merge(page_handlers::guarded_routes())
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::gate_middleware,
        ))
        .route("/health", get(http::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
