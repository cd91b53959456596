//! Entity records and their create/update request shapes.

mod car;
mod engine;

pub use car::{Car, CarRequest, EngineRef, FuelType, ParseFuelTypeError};
pub use engine::{Engine, EngineRequest};

use uuid::Uuid;

/// A persisted record with a primary key, named in logs by `KIND`.
pub trait Identified {
    const KIND: &'static str;

    fn id(&self) -> Uuid;
}

impl Identified for Car {
    const KIND: &'static str = "car";

    fn id(&self) -> Uuid {
        self.car_id
    }
}

impl Identified for Engine {
    const KIND: &'static str = "engine";

    fn id(&self) -> Uuid {
        self.engine_id
    }
}
