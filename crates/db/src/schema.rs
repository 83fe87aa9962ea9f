use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create timetables table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS timetables (
            id BIGSERIAL PRIMARY KEY,
            hospital_id BIGINT NOT NULL,
            doctor_id BIGINT NOT NULL,
            starts_at TIMESTAMP WITH TIME ZONE NOT NULL,
            ends_at TIMESTAMP WITH TIME ZONE NOT NULL,
            room VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (ends_at > starts_at)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Appointments reference timetables by id only; the orphan delete policy
    // keeps them after their timetable is gone.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id BIGSERIAL PRIMARY KEY,
            timetable_id BIGINT NOT NULL,
            user_id BIGINT NOT NULL,
            appointment_time TIMESTAMP WITH TIME ZONE NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT unique_appointment_slot UNIQUE (timetable_id, appointment_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes (unprepared so several statements can run in one call)
    pool.execute(
        r#"
        CREATE INDEX IF NOT EXISTS idx_timetables_hospital_id ON timetables(hospital_id);
        CREATE INDEX IF NOT EXISTS idx_timetables_doctor_id ON timetables(doctor_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_user_id ON appointments(user_id);
        "#,
    )
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
