use super::{parse_id, within};
use crate::error::AppError;
use crate::model::EngineRequest;
use crate::response::{success_created, success_one};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub async fn get_engine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let engine_id = parse_id(&id)?;
    let engine = within(state.request_timeout, state.engines.get_by_id(engine_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("engine {}", engine_id)))?;
    Ok(success_one(engine))
}

pub async fn create_engine(
    State(state): State<AppState>,
    payload: Result<Json<EngineRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let engine = within(state.request_timeout, state.engines.create(&request)).await?;
    Ok(success_created(engine))
}

pub async fn update_engine(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EngineRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let engine_id = parse_id(&id)?;
    let Json(request) = payload?;
    let engine = within(state.request_timeout, state.engines.update(engine_id, &request)).await?;
    Ok(success_one(engine))
}

pub async fn delete_engine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let engine_id = parse_id(&id)?;
    within(state.request_timeout, state.engines.delete(engine_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
