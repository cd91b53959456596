//! Car handlers: read by id, list by brand, create, update, delete.

use super::{parse_id, within};
use crate::error::AppError;
use crate::model::CarRequest;
use crate::response::{success_created, success_many, success_one};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BrandQuery {
    pub brand: Option<String>,
    #[serde(rename = "isEngine", default)]
    pub is_engine: bool,
}

pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let car_id = parse_id(&id)?;
    let car = within(state.request_timeout, state.cars.get_by_id(car_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("car {}", car_id)))?;
    Ok(success_one(car))
}

pub async fn get_cars_by_brand(
    State(state): State<AppState>,
    query: Result<Query<BrandQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    let brand = query
        .brand
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("brand query parameter is required".into()))?;
    let cars = within(
        state.request_timeout,
        state.cars.get_by_brand(&brand, query.is_engine),
    )
    .await?;
    Ok(success_many(cars))
}

pub async fn create_car(
    State(state): State<AppState>,
    payload: Result<Json<CarRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let car = within(state.request_timeout, state.cars.create(&request)).await?;
    Ok(success_created(car))
}

pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CarRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let car_id = parse_id(&id)?;
    let Json(request) = payload?;
    let car = within(state.request_timeout, state.cars.update(car_id, &request)).await?;
    Ok(success_one(car))
}

/// 204 carries no body; the removed snapshot is only logged.
pub async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let car_id = parse_id(&id)?;
    let deleted = within(state.request_timeout, state.cars.delete(car_id)).await?;
    tracing::debug!(car_id = %deleted.car_id, brand = %deleted.brand, "car removed");
    Ok(StatusCode::NO_CONTENT)
}
