use chrono::{DateTime, Utc};
use scheduling_core::models::{appointment::Appointment, timetable::Timetable};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct DbTimetable {
    pub id: i64,
    pub hospital_id: i64,
    pub doctor_id: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub room: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbTimetable> for Timetable {
    fn from(row: DbTimetable) -> Self {
        Self {
            id: row.id,
            hospital_id: row.hospital_id,
            doctor_id: row.doctor_id,
            from: row.starts_at,
            to: row.ends_at,
            room: row.room,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbAppointment {
    pub id: i64,
    pub timetable_id: i64,
    pub user_id: i64,
    pub appointment_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<DbAppointment> for Appointment {
    fn from(row: DbAppointment) -> Self {
        Self {
            id: row.id,
            timetable_id: row.timetable_id,
            user_id: row.user_id,
            appointment_time: row.appointment_time,
            created_at: row.created_at,
        }
    }
}
