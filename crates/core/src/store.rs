//! Persistence contract for timetables and appointments.

use async_trait::async_trait;

use crate::{
    errors::StoreResult,
    models::{
        appointment::{Appointment, NewAppointment},
        timetable::{Timetable, TimetableDraft},
    },
};

/// Storage backend used by the [`SchedulingEngine`](crate::engine::SchedulingEngine).
///
/// Implementations must make `create_appointment` reject a second appointment
/// with the same `(timetable_id, appointment_time)` atomically, returning
/// [`StoreError::SlotTaken`](crate::errors::StoreError::SlotTaken), and reject an
/// instant outside the timetable's current window in the same unit of work
/// ([`StoreError::OutsideWindow`](crate::errors::StoreError::OutsideWindow)). Lookups and
/// mutations by id report [`StoreError::NotFound`](crate::errors::StoreError::NotFound)
/// for ids that do not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn create_timetable(&self, draft: &TimetableDraft) -> StoreResult<Timetable>;

    async fn get_timetable(&self, id: i64) -> StoreResult<Timetable>;

    /// Overwrites every caller-supplied field of the timetable.
    async fn update_timetable(&self, id: i64, draft: &TimetableDraft) -> StoreResult<Timetable>;

    /// Removes the timetable only; appointments referencing it are left in place.
    async fn delete_timetable(&self, id: i64) -> StoreResult<()>;

    /// Removes the timetable if no appointment references it, checked and
    /// deleted in one unit of work. Fails with
    /// [`StoreError::InUse`](crate::errors::StoreError::InUse) otherwise.
    async fn delete_empty_timetable(&self, id: i64) -> StoreResult<()>;

    /// Removes the timetable and all of its appointments in one unit of work.
    /// Returns the number of appointments removed.
    async fn delete_timetable_with_appointments(&self, id: i64) -> StoreResult<u64>;

    /// A page of timetables ordered by id.
    async fn list_timetables(&self, offset: u32, limit: u32) -> StoreResult<Vec<Timetable>>;

    async fn list_appointments(&self, timetable_id: i64) -> StoreResult<Vec<Appointment>>;

    async fn get_appointment(&self, id: i64) -> StoreResult<Appointment>;

    async fn create_appointment(&self, appointment: &NewAppointment) -> StoreResult<Appointment>;

    async fn delete_appointment(&self, id: i64) -> StoreResult<()>;
}
