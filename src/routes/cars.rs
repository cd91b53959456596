//! Car routes under `/v1/cars`.

use super::API_VERSION;
use crate::handlers::car::{create_car, delete_car, get_car, get_cars_by_brand, update_car};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn car_routes(state: AppState) -> Router {
    let base = format!("{}/cars", API_VERSION);
    Router::new()
        .route(&base, get(get_cars_by_brand).post(create_car))
        .route(&format!("{}/", base), get(get_cars_by_brand).post(create_car))
        .route(
            &format!("{}/:id", base),
            get(get_car).patch(update_car).delete(delete_car),
        )
        .with_state(state)
}
