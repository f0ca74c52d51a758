//! # folio-api: HTTP JSON API for Folio
//!
//! Thin axum layer over [`folio_core`] (totals, lifecycle, stats) and
//! [`folio_db`] (SQLite persistence).
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP request                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TraceLayer / CorsLayer                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  routes::* handler ──► folio-core (validate, compute, transition)      │
//! │       │                      │                                          │
//! │       │                      ▼                                          │
//! │       │               folio-db repositories ──► SQLite                 │
//! │       ▼                                                                 │
//! │  Json<T>  or  ApiError { code, message } with HTTP status              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, FolioConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/clients",
            get(routes::clients::list_clients).post(routes::clients::create_client),
        )
        .route("/clients/{id}", get(routes::clients::get_client))
        .route("/invoices/totals", post(routes::invoices::preview_totals))
        .route("/invoices/mark-overdue", post(routes::invoices::mark_overdue))
        .route(
            "/invoices",
            get(routes::invoices::list_invoices).post(routes::invoices::create_invoice),
        )
        .route(
            "/invoices/{id}",
            get(routes::invoices::get_invoice).put(routes::invoices::update_invoice),
        )
        .route("/invoices/{id}/send", post(routes::invoices::send_invoice))
        .route("/invoices/{id}/cancel", post(routes::invoices::cancel_invoice))
        .route("/invoices/{id}/payments", post(routes::invoices::record_payment))
        .route("/dashboard/stats", get(routes::dashboard::stats))
        .route("/dashboard/revenue", get(routes::dashboard::revenue))
        .route("/dashboard/status", get(routes::dashboard::status));

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
