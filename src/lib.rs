//! Car registry: REST backend for car and engine records on PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod repository;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use migration::{apply_schema, apply_schema_file};
pub use model::{Car, CarRequest, Engine, EngineRef, EngineRequest, FuelType, Identified};
pub use repository::{CarRepository, EngineRepository, PgCarRepository, PgEngineRepository, Repository};
pub use response::{success_created, success_many, success_one};
pub use routes::{app, car_routes, common_routes_with_ready, engine_routes};
pub use service::{CarService, CrudService, EngineService, RequestValidator, RuleSet};
pub use state::AppState;
pub use store::{connect, ensure_database_exists};
