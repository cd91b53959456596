use super::{engine_reference, CarRepository, Repository};
use crate::error::AppError;
use crate::model::{Car, CarRequest, Engine, FuelType};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

const SELECT_JOINED_BY_ID: &str = r#"
    SELECT c.car_id, c.name, c.year, c.brand, c.fuel_type, c.engine_id, c.price, c.created_at, c.updated_at,
           e.displacement, e.no_of_cylinders, e.car_range
    FROM cars c
    LEFT JOIN engines e ON c.engine_id = e.engine_id
    WHERE c.car_id = $1
"#;

const SELECT_JOINED_BY_BRAND: &str = r#"
    SELECT c.car_id, c.name, c.year, c.brand, c.fuel_type, c.engine_id, c.price, c.created_at, c.updated_at,
           e.displacement, e.no_of_cylinders, e.car_range
    FROM cars c
    LEFT JOIN engines e ON c.engine_id = e.engine_id
    WHERE c.brand = $1
    ORDER BY c.car_id
"#;

const SELECT_BY_BRAND: &str = r#"
    SELECT car_id, name, year, brand, fuel_type, engine_id, price, created_at, updated_at
    FROM cars
    WHERE brand = $1
    ORDER BY car_id
"#;

const INSERT: &str = r#"
    INSERT INTO cars (car_id, name, year, brand, fuel_type, engine_id, price, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    RETURNING car_id, name, year, brand, fuel_type, engine_id, price, created_at, updated_at
"#;

// updated_at only moves forward, even if the clock reads the same microsecond twice.
const UPDATE: &str = r#"
    UPDATE cars
    SET name = $2, year = $3, brand = $4, fuel_type = $5, engine_id = $6, price = $7,
        updated_at = GREATEST($8, updated_at + INTERVAL '1 microsecond')
    WHERE car_id = $1
"#;

#[derive(Clone)]
pub struct PgCarRepository {
    pool: PgPool,
}

impl PgCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a cars row; engine columns are read only when the query joined them and the engine row exists.
fn car_from_row(row: &PgRow, joined: bool) -> Result<Car, sqlx::Error> {
    let fuel_type: String = row.try_get("fuel_type")?;
    let fuel_type: FuelType = fuel_type
        .parse()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let engine_id: Uuid = row.try_get("engine_id")?;
    let engine = if joined {
        let displacement: Option<i32> = row.try_get("displacement")?;
        let no_of_cylinders: Option<i32> = row.try_get("no_of_cylinders")?;
        let car_range: Option<i32> = row.try_get("car_range")?;
        match (displacement, no_of_cylinders, car_range) {
            (Some(displacement), Some(no_of_cylinders), Some(car_range)) => Some(Engine {
                engine_id,
                displacement,
                no_of_cylinders,
                car_range,
            }),
            _ => None,
        }
    } else {
        None
    };
    Ok(Car {
        car_id: row.try_get("car_id")?,
        name: row.try_get("name")?,
        year: row.try_get("year")?,
        brand: row.try_get("brand")?,
        fuel_type,
        engine_id,
        engine,
        price: row.try_get("price")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Validated pieces of a request the store needs. Services validate first; this guards direct callers.
fn checked_request(request: &CarRequest) -> Result<(Uuid, FuelType), AppError> {
    let engine_id = request
        .engine_id()
        .ok_or_else(|| AppError::Validation("engine is required".into()))?;
    let fuel_type = request
        .fuel_type
        .parse::<FuelType>()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok((engine_id, fuel_type))
}

/// Fast-path existence check; the foreign key on cars.engine_id stays the authoritative guard.
async fn require_engine(conn: &mut PgConnection, engine_id: Uuid) -> Result<Engine, AppError> {
    sqlx::query_as::<_, Engine>(
        "SELECT engine_id, displacement, no_of_cylinders, car_range FROM engines WHERE engine_id = $1",
    )
    .bind(engine_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::Referential(missing_engine(engine_id)))
}

fn missing_engine(engine_id: Uuid) -> String {
    format!("engine {} does not exist", engine_id)
}

#[async_trait]
impl Repository for PgCarRepository {
    type Entity = Car;
    type Request = CarRequest;
    type Id = Uuid;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Car>, AppError> {
        tracing::debug!(sql = SELECT_JOINED_BY_ID, car_id = %id, "query");
        let row = sqlx::query(SELECT_JOINED_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| car_from_row(&r, true)).transpose()?)
    }

    async fn create(&self, request: &CarRequest) -> Result<Car, AppError> {
        let (engine_id, fuel_type) = checked_request(request)?;
        let mut tx = self.pool.begin().await?;
        let engine = require_engine(&mut *tx, engine_id).await?;

        let car_id = Uuid::new_v4();
        let now = Utc::now();
        tracing::debug!(sql = INSERT, car_id = %car_id, engine_id = %engine_id, "query (tx)");
        let row = sqlx::query(INSERT)
            .bind(car_id)
            .bind(&request.name)
            .bind(request.year)
            .bind(&request.brand)
            .bind(fuel_type.as_str())
            .bind(engine_id)
            .bind(request.price)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| engine_reference(e, || missing_engine(engine_id)))?;
        let mut car = car_from_row(&row, false)?;
        car.engine = Some(engine);
        tx.commit().await?;
        Ok(car)
    }

    async fn update(&self, id: Uuid, request: &CarRequest) -> Result<Car, AppError> {
        let (engine_id, fuel_type) = checked_request(request)?;
        let mut tx = self.pool.begin().await?;
        // A missing car wins over a missing engine.
        sqlx::query("SELECT car_id FROM cars WHERE car_id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("car {}", id)))?;
        require_engine(&mut *tx, engine_id).await?;

        tracing::debug!(sql = UPDATE, car_id = %id, "query (tx)");
        let result = sqlx::query(UPDATE)
            .bind(id)
            .bind(&request.name)
            .bind(request.year)
            .bind(&request.brand)
            .bind(fuel_type.as_str())
            .bind(engine_id)
            .bind(request.price)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(|e| engine_reference(e, || missing_engine(engine_id)))?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("car {}", id)));
        }
        let row = sqlx::query(SELECT_JOINED_BY_ID)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let car = car_from_row(&row, true)?;
        tx.commit().await?;
        Ok(car)
    }

    async fn delete(&self, id: Uuid) -> Result<Car, AppError> {
        tracing::debug!(sql = SELECT_JOINED_BY_ID, car_id = %id, "query (tx)");
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(SELECT_JOINED_BY_ID)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("car {}", id)))?;
        let car = car_from_row(&row, true)?;

        let result = sqlx::query("DELETE FROM cars WHERE car_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        match result.rows_affected() {
            1 => {}
            0 => return Err(AppError::NotFound(format!("car {}", id))),
            n => return Err(AppError::Conflict(format!("delete of car {} removed {} rows", id, n))),
        }
        tx.commit().await?;
        Ok(car)
    }
}

#[async_trait]
impl CarRepository for PgCarRepository {
    async fn get_by_brand(&self, brand: &str, include_engine: bool) -> Result<Vec<Car>, AppError> {
        let sql = if include_engine {
            SELECT_JOINED_BY_BRAND
        } else {
            SELECT_BY_BRAND
        };
        tracing::debug!(sql = sql, brand = %brand, "query");
        let rows = sqlx::query(sql).bind(brand).fetch_all(&self.pool).await?;
        let cars = rows
            .iter()
            .map(|r| car_from_row(r, include_engine))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cars)
    }
}
