//! Store access: the CRUD contract shared by every entity and its PostgreSQL implementations.

mod car;
mod engine;

pub use car::PgCarRepository;
pub use engine::PgEngineRepository;

use crate::error::AppError;
use crate::model::{Car, CarRequest, Engine, EngineRequest};
use async_trait::async_trait;
use std::fmt::Display;
use uuid::Uuid;

/// CRUD over one table. Absent rows are `Ok(None)` on read and `AppError::NotFound` on mutation.
#[async_trait]
pub trait Repository: Send + Sync {
    type Entity: Send;
    type Request: Send + Sync;
    type Id: Copy + Display + Send + Sync;

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Entity>, AppError>;

    /// Insert a new row under a freshly generated id and return it as persisted.
    async fn create(&self, request: &Self::Request) -> Result<Self::Entity, AppError>;

    /// Replace every mutable field of the row.
    async fn update(&self, id: Self::Id, request: &Self::Request) -> Result<Self::Entity, AppError>;

    /// Remove the row and return its state from just before the delete.
    async fn delete(&self, id: Self::Id) -> Result<Self::Entity, AppError>;
}

#[async_trait]
pub trait CarRepository: Repository<Entity = Car, Request = CarRequest, Id = Uuid> {
    /// Cars of one brand ordered by `car_id`, optionally with their engines joined.
    async fn get_by_brand(&self, brand: &str, include_engine: bool) -> Result<Vec<Car>, AppError>;
}

/// Keep the classified error but name the engine instead of the constraint.
fn engine_reference(e: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    match AppError::from_db(e) {
        AppError::Referential(_) => AppError::Referential(message()),
        other => other,
    }
}

pub trait EngineRepository: Repository<Entity = Engine, Request = EngineRequest, Id = Uuid> {}

impl<T> EngineRepository for T where T: Repository<Entity = Engine, Request = EngineRequest, Id = Uuid> {}
