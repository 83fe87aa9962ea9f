use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use scheduling_core::models::{
    appointment::Appointment,
    timetable::{Timetable, TimetableRequest},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    ApiState,
    middleware::{
        auth::{AdminCaller, Caller},
        error_handling::AppError,
    },
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListTimetablesQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_timetables(
    State(state): State<Arc<ApiState>>,
    _caller: Caller,
    query: Result<Query<ListTimetablesQuery>, QueryRejection>,
) -> Result<Json<Vec<Timetable>>, AppError> {
    let Query(query) = query?;
    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);

    let timetables = state.engine.list_timetables(offset, limit).await?;
    Ok(Json(timetables))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn create_timetable(
    State(state): State<Arc<ApiState>>,
    _admin: AdminCaller,
    payload: Result<Json<TimetableRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Timetable>), AppError> {
    let Json(payload) = payload?;

    let timetable = state.engine.create_timetable(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(timetable)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn get_timetable(
    State(state): State<Arc<ApiState>>,
    _caller: Caller,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Timetable>, AppError> {
    let Path(id) = id?;

    let timetable = state.engine.get_timetable(id).await?;
    Ok(Json(timetable))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn update_timetable(
    State(state): State<Arc<ApiState>>,
    _admin: AdminCaller,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TimetableRequest>, JsonRejection>,
) -> Result<Json<Timetable>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;

    let timetable = state.engine.update_timetable(id, payload.into()).await?;
    Ok(Json(timetable))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn delete_timetable(
    State(state): State<Arc<ApiState>>,
    _admin: AdminCaller,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;

    state.engine.delete_timetable(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn get_timetable_appointments(
    State(state): State<Arc<ApiState>>,
    _caller: Caller,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let Path(id) = id?;

    let appointments = state.engine.get_appointments(id).await?;
    Ok(Json(appointments))
}
