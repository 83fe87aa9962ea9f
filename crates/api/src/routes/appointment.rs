use axum::{Router, routing::post};
use std::sync::Arc;

use crate::{ApiState, handlers};

// POST takes the timetable id, DELETE the appointment id. One pattern, since
// the router rejects two parameter names in the same segment.
pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/v1/appointments/:id",
        post(handlers::appointment::create_appointment)
            .delete(handlers::appointment::delete_appointment),
    )
}
