//! HTTP router for the forecast API.
//!
//! Provides endpoints for:
//! - Predictions for single records and batches
//! - Liveness and readiness probes
//! - Prometheus metrics

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Build the service router with its middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict::predict_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
