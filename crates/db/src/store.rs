//! PostgreSQL implementation of the [`ScheduleStore`] contract.
//!
//! Multi-statement operations run inside a transaction that first takes a row
//! lock on the parent timetable. Checks that depend on the timetable (booking
//! window, remaining appointments) read the locked row, so they hold across
//! server processes sharing the database. A dropped future rolls its
//! transaction back, so a cancelled request never leaves a half-applied booking
//! or cascade.

use async_trait::async_trait;
use eyre::Report;
use scheduling_core::{
    errors::{StoreError, StoreResult},
    models::{
        appointment::{Appointment, NewAppointment},
        timetable::{Timetable, TimetableDraft},
    },
    store::ScheduleStore,
};
use tracing::error;

use crate::{
    DbPool,
    repositories::{appointment, timetable},
};

#[derive(Debug, Clone)]
pub struct PgScheduleStore {
    pool: DbPool,
}

impl PgScheduleStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Wraps a repository failure with the operation that produced it. Pool
/// exhaustion is reported as a timeout so callers can retry.
fn store_failure(operation: &'static str) -> impl FnOnce(Report) -> StoreError {
    move |err| {
        if matches!(
            err.downcast_ref::<sqlx::Error>(),
            Some(sqlx::Error::PoolTimedOut)
        ) {
            return StoreError::Timeout { operation };
        }
        error!(operation, error = %err, "database operation failed");
        StoreError::backend(operation, err)
    }
}

fn sqlx_failure(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| store_failure(operation)(Report::new(err))
}

#[async_trait]
impl ScheduleStore for PgScheduleStore {
    async fn create_timetable(&self, draft: &TimetableDraft) -> StoreResult<Timetable> {
        let row = timetable::create_timetable(&self.pool, draft)
            .await
            .map_err(store_failure("create_timetable"))?;
        Ok(row.into())
    }

    async fn get_timetable(&self, id: i64) -> StoreResult<Timetable> {
        timetable::get_timetable_by_id(&self.pool, id)
            .await
            .map_err(store_failure("get_timetable"))?
            .map(Timetable::from)
            .ok_or_else(|| StoreError::timetable_not_found(id))
    }

    async fn update_timetable(&self, id: i64, draft: &TimetableDraft) -> StoreResult<Timetable> {
        timetable::update_timetable(&self.pool, id, draft)
            .await
            .map_err(store_failure("update_timetable"))?
            .map(Timetable::from)
            .ok_or_else(|| StoreError::timetable_not_found(id))
    }

    async fn delete_timetable(&self, id: i64) -> StoreResult<()> {
        let removed = timetable::delete_timetable(&self.pool, id)
            .await
            .map_err(store_failure("delete_timetable"))?;
        if removed == 0 {
            return Err(StoreError::timetable_not_found(id));
        }
        Ok(())
    }

    async fn delete_empty_timetable(&self, id: i64) -> StoreResult<()> {
        const OPERATION: &str = "delete_empty_timetable";

        let mut tx = self.pool.begin().await.map_err(sqlx_failure(OPERATION))?;

        let locked = timetable::lock_timetable(&mut *tx, id)
            .await
            .map_err(store_failure(OPERATION))?;
        if locked.is_none() {
            return Err(StoreError::timetable_not_found(id));
        }

        let appointments = appointment::count_appointments_by_timetable_id(&mut *tx, id)
            .await
            .map_err(store_failure(OPERATION))?;
        if appointments > 0 {
            return Err(StoreError::InUse {
                timetable_id: id,
                appointments,
            });
        }

        timetable::delete_timetable(&mut *tx, id)
            .await
            .map_err(store_failure(OPERATION))?;

        tx.commit().await.map_err(sqlx_failure(OPERATION))?;
        Ok(())
    }

    async fn delete_timetable_with_appointments(&self, id: i64) -> StoreResult<u64> {
        const OPERATION: &str = "delete_timetable_with_appointments";

        let mut tx = self.pool.begin().await.map_err(sqlx_failure(OPERATION))?;

        let locked = timetable::lock_timetable(&mut *tx, id)
            .await
            .map_err(store_failure(OPERATION))?;
        if locked.is_none() {
            return Err(StoreError::timetable_not_found(id));
        }

        let removed = appointment::delete_appointments_by_timetable_id(&mut *tx, id)
            .await
            .map_err(store_failure(OPERATION))?;
        timetable::delete_timetable(&mut *tx, id)
            .await
            .map_err(store_failure(OPERATION))?;

        tx.commit().await.map_err(sqlx_failure(OPERATION))?;
        Ok(removed)
    }

    async fn list_timetables(&self, offset: u32, limit: u32) -> StoreResult<Vec<Timetable>> {
        let rows = timetable::list_timetables(&self.pool, offset, limit)
            .await
            .map_err(store_failure("list_timetables"))?;
        Ok(rows.into_iter().map(Timetable::from).collect())
    }

    async fn list_appointments(&self, timetable_id: i64) -> StoreResult<Vec<Appointment>> {
        let rows = appointment::get_appointments_by_timetable_id(&self.pool, timetable_id)
            .await
            .map_err(store_failure("list_appointments"))?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    async fn get_appointment(&self, id: i64) -> StoreResult<Appointment> {
        appointment::get_appointment_by_id(&self.pool, id)
            .await
            .map_err(store_failure("get_appointment"))?
            .map(Appointment::from)
            .ok_or_else(|| StoreError::appointment_not_found(id))
    }

    async fn create_appointment(&self, new: &NewAppointment) -> StoreResult<Appointment> {
        const OPERATION: &str = "create_appointment";

        let mut tx = self.pool.begin().await.map_err(sqlx_failure(OPERATION))?;

        let locked = timetable::lock_timetable(&mut *tx, new.timetable_id)
            .await
            .map_err(store_failure(OPERATION))?
            .map(Timetable::from)
            .ok_or_else(|| StoreError::timetable_not_found(new.timetable_id))?;
        if !locked.covers(new.appointment_time) {
            return Err(StoreError::OutsideWindow {
                timetable_id: new.timetable_id,
                time: new.appointment_time,
            });
        }

        let created = appointment::create_appointment(&mut *tx, new)
            .await
            .map_err(store_failure(OPERATION))?;
        let Some(row) = created else {
            return Err(StoreError::SlotTaken {
                timetable_id: new.timetable_id,
                time: new.appointment_time,
            });
        };

        tx.commit().await.map_err(sqlx_failure(OPERATION))?;
        Ok(row.into())
    }

    async fn delete_appointment(&self, id: i64) -> StoreResult<()> {
        let removed = appointment::delete_appointment(&self.pool, id)
            .await
            .map_err(store_failure("delete_appointment"))?;
        if removed == 0 {
            return Err(StoreError::appointment_not_found(id));
        }
        Ok(())
    }
}
