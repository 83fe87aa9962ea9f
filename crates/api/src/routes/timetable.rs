use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/v1/timetables",
            get(handlers::timetable::list_timetables).post(handlers::timetable::create_timetable),
        )
        .route(
            "/api/v1/timetables/:id",
            get(handlers::timetable::get_timetable)
                .put(handlers::timetable::update_timetable)
                .delete(handlers::timetable::delete_timetable),
        )
        .route(
            "/api/v1/timetables/:id/appointments",
            get(handlers::timetable::get_timetable_appointments),
        )
}
