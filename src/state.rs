//! Shared application state for all routes.

use crate::repository::{PgCarRepository, PgEngineRepository};
use crate::service::{CarService, EngineService};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub cars: CarService,
    pub engines: EngineService,
    /// Deadline for each service call made by a handler.
    pub request_timeout: Duration,
}

impl AppState {
    /// State backed by the PostgreSQL repositories.
    pub fn new(pool: PgPool, request_timeout: Duration) -> Self {
        let cars = CarService::for_cars(Arc::new(PgCarRepository::new(pool.clone())));
        let engines = EngineService::for_engines(Arc::new(PgEngineRepository::new(pool.clone())));
        AppState {
            pool,
            cars,
            engines,
            request_timeout,
        }
    }
}
