//! Router assembly: entity routes under the versioned prefix plus operational routes.

mod cars;
mod common;
mod engines;

pub use cars::car_routes;
pub use common::common_routes_with_ready;
pub use engines::engine_routes;

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

pub const API_VERSION: &str = "/v1";

/// Every route of the service with request tracing and a body size cap.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(car_routes(state.clone()))
        .merge(engine_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body_bytes)),
        )
}
