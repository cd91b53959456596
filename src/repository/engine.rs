use super::{engine_reference, Repository};
use crate::error::AppError;
use crate::model::{Engine, EngineRequest};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const SELECT_BY_ID: &str =
    "SELECT engine_id, displacement, no_of_cylinders, car_range FROM engines WHERE engine_id = $1";

#[derive(Clone)]
pub struct PgEngineRepository {
    pool: PgPool,
}

impl PgEngineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PgEngineRepository {
    type Entity = Engine;
    type Request = EngineRequest;
    type Id = Uuid;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Engine>, AppError> {
        tracing::debug!(sql = SELECT_BY_ID, engine_id = %id, "query");
        let engine = sqlx::query_as::<_, Engine>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(engine)
    }

    async fn create(&self, request: &EngineRequest) -> Result<Engine, AppError> {
        let engine_id = Uuid::new_v4();
        let sql = "INSERT INTO engines (engine_id, displacement, no_of_cylinders, car_range) \
                   VALUES ($1, $2, $3, $4) \
                   RETURNING engine_id, displacement, no_of_cylinders, car_range";
        tracing::debug!(sql = sql, engine_id = %engine_id, "query (tx)");
        let mut tx = self.pool.begin().await?;
        let engine = sqlx::query_as::<_, Engine>(sql)
            .bind(engine_id)
            .bind(request.displacement)
            .bind(request.no_of_cylinders)
            .bind(request.car_range)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(engine)
    }

    async fn update(&self, id: Uuid, request: &EngineRequest) -> Result<Engine, AppError> {
        let sql = "UPDATE engines SET displacement = $2, no_of_cylinders = $3, car_range = $4 \
                   WHERE engine_id = $1";
        tracing::debug!(sql = sql, engine_id = %id, "query (tx)");
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(sql)
            .bind(id)
            .bind(request.displacement)
            .bind(request.no_of_cylinders)
            .bind(request.car_range)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("engine {}", id)));
        }
        let engine = sqlx::query_as::<_, Engine>(SELECT_BY_ID)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(engine)
    }

    async fn delete(&self, id: Uuid) -> Result<Engine, AppError> {
        tracing::debug!(sql = SELECT_BY_ID, engine_id = %id, "query (tx)");
        let mut tx = self.pool.begin().await?;
        let engine = sqlx::query_as::<_, Engine>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("engine {}", id)))?;
        // Fails with a foreign key violation while any car still references the engine.
        let result = sqlx::query("DELETE FROM engines WHERE engine_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| engine_reference(e, || format!("engine {} is still referenced by a car", id)))?;
        match result.rows_affected() {
            1 => {}
            0 => return Err(AppError::NotFound(format!("engine {}", id))),
            n => return Err(AppError::Conflict(format!("delete of engine {} removed {} rows", id, n))),
        }
        tx.commit().await?;
        Ok(engine)
    }
}
