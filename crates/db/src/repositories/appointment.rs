use crate::models::DbAppointment;
use chrono::Utc;
use eyre::Result;
use scheduling_core::models::appointment::NewAppointment;
use sqlx::postgres::PgExecutor;

/// Inserts the appointment unless its slot is already booked, in which case
/// `None` is returned and nothing is written.
pub async fn create_appointment<'e>(
    executor: impl PgExecutor<'e>,
    appointment: &NewAppointment,
) -> Result<Option<DbAppointment>> {
    let created = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (timetable_id, user_id, appointment_time, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (timetable_id, appointment_time) DO NOTHING
        RETURNING id, timetable_id, user_id, appointment_time, created_at
        "#,
    )
    .bind(appointment.timetable_id)
    .bind(appointment.user_id)
    .bind(appointment.appointment_time)
    .bind(Utc::now())
    .fetch_optional(executor)
    .await?;

    Ok(created)
}

pub async fn get_appointment_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, timetable_id, user_id, appointment_time, created_at
        FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(appointment)
}

pub async fn get_appointments_by_timetable_id<'e>(
    executor: impl PgExecutor<'e>,
    timetable_id: i64,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, timetable_id, user_id, appointment_time, created_at
        FROM appointments
        WHERE timetable_id = $1
        ORDER BY appointment_time ASC
        "#,
    )
    .bind(timetable_id)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}

pub async fn delete_appointment<'e>(executor: impl PgExecutor<'e>, id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_appointments_by_timetable_id<'e>(
    executor: impl PgExecutor<'e>,
    timetable_id: i64,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM appointments
        WHERE timetable_id = $1
        "#,
    )
    .bind(timetable_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn count_appointments_by_timetable_id<'e>(
    executor: impl PgExecutor<'e>,
    timetable_id: i64,
) -> Result<u64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM appointments
        WHERE timetable_id = $1
        "#,
    )
    .bind(timetable_id)
    .fetch_one(executor)
    .await?;

    Ok(count as u64)
}
