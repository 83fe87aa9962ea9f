//! # Scheduling Engine
//!
//! Timetable lifecycle, time-range validation and appointment placement.
//!
//! ## Booking serialization
//!
//! Placing an appointment is a read-check-write sequence: load the timetable,
//! check the instant against its window, scan existing bookings, insert. Two
//! requests racing on the same timetable could both pass the scan. The engine
//! therefore holds a per-timetable async mutex for the whole sequence, and the
//! store contract additionally requires the insert itself to reject a duplicate
//! `(timetable_id, appointment_time)` or an instant outside the stored window,
//! and the `reject` delete policy to check for bookings in the same unit of
//! work as the delete, so that separate processes sharing one database stay
//! consistent too.
//!
//! Every store call and every lock acquisition is bounded by
//! [`EngineConfig::store_timeout`]. Expiry surfaces as
//! [`SchedulingError::StoreUnavailable`], which callers may retry.

use std::{
    collections::HashMap,
    fmt,
    future::Future,
    str::FromStr,
    sync::{Arc, Mutex, PoisonError, Weak},
    time::Duration,
};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::{
    errors::{SchedulingError, SchedulingResult, StoreError, StoreResult},
    models::{
        appointment::{Appointment, NewAppointment},
        identity::Identity,
        timetable::{Timetable, TimetableDraft},
    },
    store::ScheduleStore,
};

/// What happens to a timetable's appointments when the timetable is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Remove the timetable and its appointments together.
    #[default]
    Cascade,
    /// Refuse to delete a timetable that still has appointments.
    Reject,
    /// Remove only the timetable; its appointments remain readable.
    Orphan,
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cascade" => Ok(DeletePolicy::Cascade),
            "reject" => Ok(DeletePolicy::Reject),
            "orphan" => Ok(DeletePolicy::Orphan),
            other => Err(format!(
                "unknown timetable delete policy '{other}' (expected cascade, reject or orphan)"
            )),
        }
    }
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeletePolicy::Cascade => "cascade",
            DeletePolicy::Reject => "reject",
            DeletePolicy::Orphan => "orphan",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound for any single store call or timetable lock wait.
    pub store_timeout: Duration,
    pub delete_policy: DeletePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
            delete_policy: DeletePolicy::default(),
        }
    }
}

/// Async mutexes keyed by timetable id. Entries are weak so that a timetable
/// nobody is booking does not keep a lock alive.
#[derive(Default)]
struct TimetableLocks {
    slots: Mutex<HashMap<i64, Weak<AsyncMutex<()>>>>,
}

impl TimetableLocks {
    fn handle(&self, timetable_id: i64) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(lock) = slots.get(&timetable_id).and_then(Weak::upgrade) {
            return lock;
        }
        slots.retain(|_, lock| lock.strong_count() > 0);
        let lock = Arc::new(AsyncMutex::new(()));
        slots.insert(timetable_id, Arc::downgrade(&lock));
        lock
    }
}

pub struct SchedulingEngine {
    store: Arc<dyn ScheduleStore>,
    locks: TimetableLocks,
    config: EngineConfig,
}

impl SchedulingEngine {
    pub fn new(store: Arc<dyn ScheduleStore>, config: EngineConfig) -> Self {
        Self {
            store,
            locks: TimetableLocks::default(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> SchedulingResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result.map_err(SchedulingError::from),
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.config.store_timeout.as_millis() as u64,
                    "store call timed out"
                );
                Err(SchedulingError::StoreUnavailable(StoreError::Timeout {
                    operation,
                }))
            }
        }
    }

    async fn lock_timetable(&self, timetable_id: i64) -> SchedulingResult<OwnedMutexGuard<()>> {
        let lock = self.locks.handle(timetable_id);
        tokio::time::timeout(self.config.store_timeout, lock.lock_owned())
            .await
            .map_err(|_| {
                warn!(timetable_id, "timed out waiting for timetable lock");
                SchedulingError::StoreUnavailable(StoreError::Timeout {
                    operation: "lock_timetable",
                })
            })
    }

    pub async fn create_timetable(&self, draft: TimetableDraft) -> SchedulingResult<Timetable> {
        draft.validate()?;
        let timetable = self
            .bounded("create_timetable", self.store.create_timetable(&draft))
            .await?;

        info!(
            timetable_id = timetable.id,
            hospital_id = timetable.hospital_id,
            doctor_id = timetable.doctor_id,
            "timetable created"
        );
        Ok(timetable)
    }

    pub async fn get_timetable(&self, id: i64) -> SchedulingResult<Timetable> {
        self.bounded("get_timetable", self.store.get_timetable(id)).await
    }

    pub async fn update_timetable(
        &self,
        id: i64,
        draft: TimetableDraft,
    ) -> SchedulingResult<Timetable> {
        draft.validate()?;
        let _guard = self.lock_timetable(id).await?;
        let timetable = self
            .bounded("update_timetable", self.store.update_timetable(id, &draft))
            .await?;

        info!(timetable_id = id, "timetable updated");
        Ok(timetable)
    }

    /// Deletes a timetable, treating its appointments according to the
    /// configured [`DeletePolicy`].
    pub async fn delete_timetable(&self, id: i64) -> SchedulingResult<()> {
        let _guard = self.lock_timetable(id).await?;

        match self.config.delete_policy {
            DeletePolicy::Cascade => {
                let removed = self
                    .bounded(
                        "delete_timetable_with_appointments",
                        self.store.delete_timetable_with_appointments(id),
                    )
                    .await?;
                info!(timetable_id = id, appointments_removed = removed, "timetable deleted");
            }
            DeletePolicy::Reject => {
                self.bounded(
                    "delete_empty_timetable",
                    self.store.delete_empty_timetable(id),
                )
                .await?;
                info!(timetable_id = id, "timetable deleted");
            }
            DeletePolicy::Orphan => {
                self.bounded("delete_timetable", self.store.delete_timetable(id)).await?;
                info!(timetable_id = id, "timetable deleted, appointments kept");
            }
        }
        Ok(())
    }

    pub async fn list_timetables(
        &self,
        offset: u32,
        limit: u32,
    ) -> SchedulingResult<Vec<Timetable>> {
        if limit == 0 {
            return Err(SchedulingError::InvalidInput("limit must be at least 1".to_string()));
        }
        self.bounded("list_timetables", self.store.list_timetables(offset, limit)).await
    }

    pub async fn get_appointments(&self, timetable_id: i64) -> SchedulingResult<Vec<Appointment>> {
        self.bounded("list_appointments", self.store.list_appointments(timetable_id)).await
    }

    pub async fn get_appointment(&self, id: i64) -> SchedulingResult<Appointment> {
        self.bounded("get_appointment", self.store.get_appointment(id)).await
    }

    /// Books `instant` on a timetable for `user_id`.
    ///
    /// Serialized per timetable: of several concurrent calls for the same
    /// timetable and instant exactly one succeeds, the others fail with
    /// [`SchedulingError::TimeSlotTaken`].
    pub async fn create_appointment(
        &self,
        timetable_id: i64,
        user_id: i64,
        instant: DateTime<Utc>,
    ) -> SchedulingResult<Appointment> {
        let _guard = self.lock_timetable(timetable_id).await?;

        let timetable = self
            .bounded("get_timetable", self.store.get_timetable(timetable_id))
            .await?;

        if !timetable.covers(instant) {
            return Err(SchedulingError::InvalidTimeRange(format!(
                "{} is outside timetable {} ({} - {})",
                instant, timetable_id, timetable.from, timetable.to
            )));
        }

        let existing = self
            .bounded("list_appointments", self.store.list_appointments(timetable_id))
            .await?;
        if existing.iter().any(|a| a.appointment_time == instant) {
            debug!(timetable_id, %instant, "slot already booked");
            return Err(SchedulingError::TimeSlotTaken(format!(
                "timetable {timetable_id} already has an appointment at {instant}"
            )));
        }

        let new = NewAppointment {
            timetable_id,
            user_id,
            appointment_time: instant,
        };
        let appointment = self
            .bounded("create_appointment", self.store.create_appointment(&new))
            .await?;

        info!(
            appointment_id = appointment.id,
            timetable_id,
            user_id,
            "appointment booked"
        );
        Ok(appointment)
    }

    /// Cancels an appointment on behalf of `caller`, who must own it or be an
    /// administrator.
    pub async fn delete_appointment(&self, id: i64, caller: &Identity) -> SchedulingResult<()> {
        let appointment = self.get_appointment(id).await?;
        if !caller.can_delete_appointment(&appointment) {
            return Err(SchedulingError::Forbidden(format!(
                "user {} may not cancel appointment {}",
                caller.subject_id, id
            )));
        }

        self.bounded("delete_appointment", self.store.delete_appointment(id)).await?;
        info!(appointment_id = id, user_id = caller.subject_id, "appointment deleted");
        Ok(())
    }
}
