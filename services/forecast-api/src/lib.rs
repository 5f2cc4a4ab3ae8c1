//! Wind power forecast service library.
//!
//! This crate provides the HTTP server that exposes the predictor over
//! `POST /predict`, plus health, readiness and metrics endpoints.

pub mod handlers;
pub mod metrics;
pub mod server;
pub mod state;
