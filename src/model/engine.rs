use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Engine {
    pub engine_id: Uuid,
    pub displacement: i32,
    pub no_of_cylinders: i32,
    pub car_range: i32,
}

/// Body of `POST /v1/engines/` and `PATCH /v1/engines/{id}`. Absent numbers decode as 0 and fail validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineRequest {
    pub displacement: i32,
    pub no_of_cylinders: i32,
    pub car_range: i32,
}

impl EngineRequest {
    pub fn into_engine(self, engine_id: Uuid) -> Engine {
        Engine {
            engine_id,
            displacement: self.displacement,
            no_of_cylinders: self.no_of_cylinders,
            car_range: self.car_range,
        }
    }
}
