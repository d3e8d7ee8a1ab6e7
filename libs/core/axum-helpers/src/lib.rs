//! # Axum Helpers
//!
//! Shared plumbing for the workspace's Axum services.
//!
//! - **[`errors`]**: `AppError` and the structured `ErrorResponse` body
//! - **[`extractors`]**: `ValidatedJson`, `QueryParams`
//! - **[`server`]**: router assembly, health/readiness, graceful shutdown

pub mod errors;
pub mod extractors;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{QueryParams, ValidatedJson};
pub use server::{
    HealthCheckFuture, HealthResponse, ReadyResponse, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};
