use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use scheduling_core::models::appointment::{Appointment, CreateAppointmentRequest};
use std::sync::Arc;

use crate::{
    ApiState,
    middleware::{auth::Caller, error_handling::AppError},
};

/// Books the requested instant on a timetable for the calling user.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    Caller(identity): Caller,
    timetable_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let Path(timetable_id) = timetable_id?;
    let Json(payload) = payload?;

    let appointment = state
        .engine
        .create_appointment(timetable_id, identity.subject_id, payload.time)
        .await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn delete_appointment(
    State(state): State<Arc<ApiState>>,
    Caller(identity): Caller,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;

    state.engine.delete_appointment(id, &identity).await?;
    Ok(StatusCode::NO_CONTENT)
}
