use crate::models::DbTimetable;
use chrono::Utc;
use eyre::Result;
use scheduling_core::models::timetable::TimetableDraft;
use sqlx::postgres::PgExecutor;

pub async fn create_timetable<'e>(
    executor: impl PgExecutor<'e>,
    draft: &TimetableDraft,
) -> Result<DbTimetable> {
    let now = Utc::now();

    tracing::debug!(
        "Creating timetable: hospital_id={}, doctor_id={}, room={}",
        draft.hospital_id, draft.doctor_id, draft.room
    );

    let timetable = sqlx::query_as::<_, DbTimetable>(
        r#"
        INSERT INTO timetables (hospital_id, doctor_id, starts_at, ends_at, room, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING id, hospital_id, doctor_id, starts_at, ends_at, room, created_at, updated_at
        "#,
    )
    .bind(draft.hospital_id)
    .bind(draft.doctor_id)
    .bind(draft.from)
    .bind(draft.to)
    .bind(&draft.room)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(timetable)
}

pub async fn get_timetable_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
) -> Result<Option<DbTimetable>> {
    tracing::debug!("Getting timetable by id: {}", id);

    let timetable = sqlx::query_as::<_, DbTimetable>(
        r#"
        SELECT id, hospital_id, doctor_id, starts_at, ends_at, room, created_at, updated_at
        FROM timetables
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(timetable)
}

/// Takes a row lock on the timetable for the rest of the surrounding transaction
/// and returns the locked row.
pub async fn lock_timetable<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
) -> Result<Option<DbTimetable>> {
    let locked = sqlx::query_as::<_, DbTimetable>(
        r#"
        SELECT id, hospital_id, doctor_id, starts_at, ends_at, room, created_at, updated_at
        FROM timetables
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(locked)
}

pub async fn update_timetable<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
    draft: &TimetableDraft,
) -> Result<Option<DbTimetable>> {
    let updated = sqlx::query_as::<_, DbTimetable>(
        r#"
        UPDATE timetables
        SET hospital_id = $2, doctor_id = $3, starts_at = $4, ends_at = $5, room = $6, updated_at = $7
        WHERE id = $1
        RETURNING id, hospital_id, doctor_id, starts_at, ends_at, room, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(draft.hospital_id)
    .bind(draft.doctor_id)
    .bind(draft.from)
    .bind(draft.to)
    .bind(&draft.room)
    .bind(Utc::now())
    .fetch_optional(executor)
    .await?;

    Ok(updated)
}

/// Returns the number of rows removed (0 or 1).
pub async fn delete_timetable<'e>(executor: impl PgExecutor<'e>, id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM timetables
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn list_timetables<'e>(
    executor: impl PgExecutor<'e>,
    offset: u32,
    limit: u32,
) -> Result<Vec<DbTimetable>> {
    let timetables = sqlx::query_as::<_, DbTimetable>(
        r#"
        SELECT id, hospital_id, doctor_id, starts_at, ends_at, room, created_at, updated_at
        FROM timetables
        ORDER BY id ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(i64::from(limit))
    .bind(i64::from(offset))
    .fetch_all(executor)
    .await?;

    Ok(timetables)
}
