//! In-memory repositories with the same not-found and referential semantics as the PostgreSQL ones.

#![allow(dead_code)]

use async_trait::async_trait;
use car_registry::{
    AppError, AppState, Car, CarRepository, CarRequest, CarService, Engine, EngineRequest,
    EngineService, FuelType, Repository,
};
use chrono::{Duration as ChronoDuration, Utc};
use sqlx::postgres::PgPoolOptions;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    pub engines: Mutex<BTreeMap<Uuid, Engine>>,
    pub cars: Mutex<BTreeMap<Uuid, Car>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(MemoryStore::default())
    }

    pub fn car_count(&self) -> usize {
        self.cars.lock().unwrap().len()
    }

    fn engine(&self, id: Uuid) -> Option<Engine> {
        self.engines.lock().unwrap().get(&id).cloned()
    }

    fn joined(&self, mut car: Car) -> Car {
        car.engine = self.engine(car.engine_id);
        car
    }
}

#[derive(Clone)]
pub struct MemoryEngines(pub Arc<MemoryStore>);

#[async_trait]
impl Repository for MemoryEngines {
    type Entity = Engine;
    type Request = EngineRequest;
    type Id = Uuid;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Engine>, AppError> {
        Ok(self.0.engine(id))
    }

    async fn create(&self, request: &EngineRequest) -> Result<Engine, AppError> {
        let engine = request.clone().into_engine(Uuid::new_v4());
        self.0.engines.lock().unwrap().insert(engine.engine_id, engine.clone());
        Ok(engine)
    }

    async fn update(&self, id: Uuid, request: &EngineRequest) -> Result<Engine, AppError> {
        let mut engines = self.0.engines.lock().unwrap();
        let slot = engines
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("engine {}", id)))?;
        *slot = request.clone().into_engine(id);
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Engine, AppError> {
        let referenced = self.0.cars.lock().unwrap().values().any(|c| c.engine_id == id);
        if referenced {
            return Err(AppError::Referential(format!("engine {} is referenced by a car", id)));
        }
        self.0
            .engines
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("engine {}", id)))
    }
}

#[derive(Clone)]
pub struct MemoryCars(pub Arc<MemoryStore>);

fn checked(request: &CarRequest) -> Result<(Uuid, FuelType), AppError> {
    let engine_id = request
        .engine_id()
        .ok_or_else(|| AppError::Validation("engine is required".into()))?;
    let fuel_type = request
        .fuel_type
        .parse::<FuelType>()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok((engine_id, fuel_type))
}

#[async_trait]
impl Repository for MemoryCars {
    type Entity = Car;
    type Request = CarRequest;
    type Id = Uuid;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Car>, AppError> {
        let car = self.0.cars.lock().unwrap().get(&id).cloned();
        Ok(car.map(|c| self.0.joined(c)))
    }

    async fn create(&self, request: &CarRequest) -> Result<Car, AppError> {
        let (engine_id, fuel_type) = checked(request)?;
        let engine = self
            .0
            .engine(engine_id)
            .ok_or_else(|| AppError::Referential(format!("engine {} does not exist", engine_id)))?;
        let now = Utc::now();
        let car = Car {
            car_id: Uuid::new_v4(),
            name: request.name.clone(),
            year: request.year,
            brand: request.brand.clone(),
            fuel_type,
            engine_id,
            engine: Some(engine),
            price: request.price,
            created_at: now,
            updated_at: now,
        };
        let mut stored = car.clone();
        stored.engine = None;
        self.0.cars.lock().unwrap().insert(car.car_id, stored);
        Ok(car)
    }

    async fn update(&self, id: Uuid, request: &CarRequest) -> Result<Car, AppError> {
        let (engine_id, fuel_type) = checked(request)?;
        if !self.0.cars.lock().unwrap().contains_key(&id) {
            return Err(AppError::NotFound(format!("car {}", id)));
        }
        if self.0.engine(engine_id).is_none() {
            return Err(AppError::Referential(format!("engine {} does not exist", engine_id)));
        }
        let updated = {
            let mut cars = self.0.cars.lock().unwrap();
            let car = cars
                .get_mut(&id)
                .ok_or_else(|| AppError::NotFound(format!("car {}", id)))?;
            car.name = request.name.clone();
            car.year = request.year;
            car.brand = request.brand.clone();
            car.fuel_type = fuel_type;
            car.engine_id = engine_id;
            car.price = request.price;
            car.updated_at = Utc::now().max(car.updated_at + ChronoDuration::microseconds(1));
            car.clone()
        };
        Ok(self.0.joined(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<Car, AppError> {
        let removed = self
            .0
            .cars
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("car {}", id)))?;
        Ok(self.0.joined(removed))
    }
}

#[async_trait]
impl CarRepository for MemoryCars {
    async fn get_by_brand(&self, brand: &str, include_engine: bool) -> Result<Vec<Car>, AppError> {
        let cars: Vec<Car> = self
            .0
            .cars
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.brand == brand)
            .cloned()
            .collect();
        let mut cars: Vec<Car> = if include_engine {
            cars.into_iter().map(|c| self.0.joined(c)).collect()
        } else {
            cars
        };
        cars.sort_by_key(|c| c.car_id);
        Ok(cars)
    }
}

/// Car repository that fails the test if any method is reached.
pub struct UnreachableCars;

#[async_trait]
impl Repository for UnreachableCars {
    type Entity = Car;
    type Request = CarRequest;
    type Id = Uuid;

    async fn get_by_id(&self, _: Uuid) -> Result<Option<Car>, AppError> {
        panic!("repository must not be called")
    }

    async fn create(&self, _: &CarRequest) -> Result<Car, AppError> {
        panic!("repository must not be called")
    }

    async fn update(&self, _: Uuid, _: &CarRequest) -> Result<Car, AppError> {
        panic!("repository must not be called")
    }

    async fn delete(&self, _: Uuid) -> Result<Car, AppError> {
        panic!("repository must not be called")
    }
}

#[async_trait]
impl CarRepository for UnreachableCars {
    async fn get_by_brand(&self, _: &str, _: bool) -> Result<Vec<Car>, AppError> {
        panic!("repository must not be called")
    }
}

/// Wraps a car repository and stalls every read by `delay`.
pub struct SlowCars {
    pub inner: MemoryCars,
    pub delay: Duration,
}

#[async_trait]
impl Repository for SlowCars {
    type Entity = Car;
    type Request = CarRequest;
    type Id = Uuid;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Car>, AppError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_by_id(id).await
    }

    async fn create(&self, request: &CarRequest) -> Result<Car, AppError> {
        self.inner.create(request).await
    }

    async fn update(&self, id: Uuid, request: &CarRequest) -> Result<Car, AppError> {
        self.inner.update(id, request).await
    }

    async fn delete(&self, id: Uuid) -> Result<Car, AppError> {
        self.inner.delete(id).await
    }
}

#[async_trait]
impl CarRepository for SlowCars {
    async fn get_by_brand(&self, brand: &str, include_engine: bool) -> Result<Vec<Car>, AppError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_by_brand(brand, include_engine).await
    }
}

pub fn car_service(store: &Arc<MemoryStore>) -> CarService {
    CarService::for_cars(Arc::new(MemoryCars(store.clone())))
}

pub fn engine_service(store: &Arc<MemoryStore>) -> EngineService {
    EngineService::for_engines(Arc::new(MemoryEngines(store.clone())))
}

/// App state over the in-memory store, with a pool that cannot connect.
pub fn memory_state(store: &Arc<MemoryStore>, request_timeout: Duration) -> AppState {
    AppState {
        pool: lazy_pool(),
        cars: car_service(store),
        engines: engine_service(store),
        request_timeout,
    }
}

/// Pool that never reaches a server: nothing listens on port 1, and acquiring gives up quickly.
pub fn lazy_pool() -> sqlx::PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(300))
        .connect_lazy("postgres://car_registry@127.0.0.1:1/car_registry_unused")
        .expect("lazy pool")
}

pub fn engine_request() -> EngineRequest {
    EngineRequest {
        displacement: 1500,
        no_of_cylinders: 4,
        car_range: 600,
    }
}

pub fn car_request(engine_id: Uuid) -> CarRequest {
    CarRequest {
        name: "X".into(),
        year: 2020,
        brand: "Acme".into(),
        fuel_type: "Petrol".into(),
        engine: Some(car_registry::EngineRef { engine_id }),
        price: 20000.0,
    }
}
