//! Engine routes under `/v1/engines`.

use super::API_VERSION;
use crate::handlers::engine::{create_engine, delete_engine, get_engine, update_engine};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn engine_routes(state: AppState) -> Router {
    let base = format!("{}/engines", API_VERSION);
    Router::new()
        .route(&base, post(create_engine))
        .route(&format!("{}/", base), post(create_engine))
        .route(
            &format!("{}/:id", base),
            get(get_engine).patch(update_engine).delete(delete_engine),
        )
        .with_state(state)
}
