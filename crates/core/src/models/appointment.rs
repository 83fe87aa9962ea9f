use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single booked instant inside a timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub timetable_id: i64,
    pub user_id: i64,
    pub appointment_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub timetable_id: i64,
    pub user_id: i64,
    pub appointment_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub time: DateTime<Utc>,
}
