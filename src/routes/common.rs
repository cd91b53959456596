//! Operational routes: liveness, readiness against the store and schema, version.

use super::API_VERSION;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

/// True once both tables exist. Fails outright when the store is unreachable.
const SCHEMA_CHECK: &str =
    "SELECT to_regclass('cars') IS NOT NULL AND to_regclass('engines') IS NOT NULL";

#[derive(Serialize)]
struct Readiness {
    status: &'static str,
    database: &'static str,
    schema: &'static str,
}

impl Readiness {
    fn degraded(database: &'static str, schema: &'static str) -> Self {
        Readiness {
            status: "degraded",
            database,
            schema,
        }
    }
}

#[derive(Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
    api: &'static str,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let check: Result<(bool,), sqlx::Error> = sqlx::query_as(SCHEMA_CHECK).fetch_one(&state.pool).await;
    match check {
        Ok((true,)) => (
            StatusCode::OK,
            Json(Readiness {
                status: "ok",
                database: "ok",
                schema: "ok",
            }),
        ),
        Ok((false,)) => {
            tracing::warn!("readiness: cars or engines table missing");
            (StatusCode::SERVICE_UNAVAILABLE, Json(Readiness::degraded("ok", "missing")))
        }
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness::degraded("unavailable", "unknown")),
            )
        }
    }
}

async fn version() -> Json<VersionInfo> {
    Json(VersionInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        api: API_VERSION,
    })
}

/// GET /health, GET /ready, GET /version.
pub fn common_routes_with_ready(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
