//! Validation-gated CRUD over any repository.

use super::RequestValidator;
use crate::error::AppError;
use crate::model::{Car, Identified};
use crate::repository::{CarRepository, EngineRepository, Repository};
use serde::Serialize;
use std::sync::Arc;

pub struct CrudService<R: ?Sized> {
    repo: Arc<R>,
    validator: RequestValidator,
}

pub type CarService = CrudService<dyn CarRepository>;
pub type EngineService = CrudService<dyn EngineRepository>;

impl<R: ?Sized> Clone for CrudService<R> {
    fn clone(&self) -> Self {
        CrudService {
            repo: Arc::clone(&self.repo),
            validator: self.validator.clone(),
        }
    }
}

impl<R> CrudService<R>
where
    R: Repository + ?Sized,
    R::Entity: Identified,
    R::Request: Serialize,
{
    pub fn new(repo: Arc<R>, validator: RequestValidator) -> Self {
        CrudService { repo, validator }
    }

    pub async fn get_by_id(&self, id: R::Id) -> Result<Option<R::Entity>, AppError> {
        self.repo.get_by_id(id).await
    }

    /// Rejects invalid requests before the repository is touched.
    pub async fn create(&self, request: &R::Request) -> Result<R::Entity, AppError> {
        self.validator.validate(request)?;
        let entity = self.repo.create(request).await?;
        tracing::info!(entity = <R::Entity as Identified>::KIND, id = %entity.id(), "created");
        Ok(entity)
    }

    pub async fn update(&self, id: R::Id, request: &R::Request) -> Result<R::Entity, AppError> {
        self.validator.validate(request)?;
        let entity = self.repo.update(id, request).await?;
        tracing::info!(entity = <R::Entity as Identified>::KIND, id = %id, "updated");
        Ok(entity)
    }

    pub async fn delete(&self, id: R::Id) -> Result<R::Entity, AppError> {
        let entity = self.repo.delete(id).await?;
        tracing::info!(entity = <R::Entity as Identified>::KIND, id = %id, "deleted");
        Ok(entity)
    }
}

impl<R> CrudService<R>
where
    R: CarRepository + ?Sized,
{
    pub async fn get_by_brand(&self, brand: &str, include_engine: bool) -> Result<Vec<Car>, AppError> {
        self.repo.get_by_brand(brand, include_engine).await
    }
}

impl CarService {
    /// Car service with the standard car rules.
    pub fn for_cars(repo: Arc<dyn CarRepository>) -> Self {
        CrudService::new(repo, RequestValidator::new(super::RuleSet::car()))
    }
}

impl EngineService {
    pub fn for_engines(repo: Arc<dyn EngineRepository>) -> Self {
        CrudService::new(repo, RequestValidator::new(super::RuleSet::engine()))
    }
}
