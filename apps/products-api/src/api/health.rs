//! Readiness endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_helpers::{run_health_checks, HealthCheckFuture, ReadyResponse};
use database::mongodb::check_health_detailed;

use crate::state::AppState;

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let mongodb: HealthCheckFuture = Box::pin(async {
        let status = check_health_detailed(&state.db).await;
        if status.healthy {
            Ok(())
        } else {
            Err(status
                .message
                .unwrap_or_else(|| "ping failed".to_string()))
        }
    });

    run_health_checks(vec![("mongodb", mongodb)]).await
}

/// Router exposing `GET /ready`
pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
