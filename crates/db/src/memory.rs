//! In-process [`ScheduleStore`] backed by ordered maps.
//!
//! Every mutation happens under a single write lock, which makes the slot
//! uniqueness check and the insert one atomic step.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use scheduling_core::{
    errors::{StoreError, StoreResult},
    models::{
        appointment::{Appointment, NewAppointment},
        timetable::{Timetable, TimetableDraft},
    },
    store::ScheduleStore,
};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_timetable_id: i64,
    last_appointment_id: i64,
    timetables: BTreeMap<i64, Timetable>,
    appointments: BTreeMap<i64, Appointment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn create_timetable(&self, draft: &TimetableDraft) -> StoreResult<Timetable> {
        let mut state = self.state.write().await;
        state.last_timetable_id += 1;
        let now = Utc::now();
        let timetable = Timetable {
            id: state.last_timetable_id,
            hospital_id: draft.hospital_id,
            doctor_id: draft.doctor_id,
            from: draft.from,
            to: draft.to,
            room: draft.room.clone(),
            created_at: now,
            updated_at: now,
        };
        state.timetables.insert(timetable.id, timetable.clone());
        Ok(timetable)
    }

    async fn get_timetable(&self, id: i64) -> StoreResult<Timetable> {
        let state = self.state.read().await;
        state
            .timetables
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::timetable_not_found(id))
    }

    async fn update_timetable(&self, id: i64, draft: &TimetableDraft) -> StoreResult<Timetable> {
        let mut state = self.state.write().await;
        let timetable = state
            .timetables
            .get_mut(&id)
            .ok_or_else(|| StoreError::timetable_not_found(id))?;
        timetable.hospital_id = draft.hospital_id;
        timetable.doctor_id = draft.doctor_id;
        timetable.from = draft.from;
        timetable.to = draft.to;
        timetable.room = draft.room.clone();
        timetable.updated_at = Utc::now();
        Ok(timetable.clone())
    }

    async fn delete_timetable(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state
            .timetables
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::timetable_not_found(id))
    }

    async fn delete_empty_timetable(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if !state.timetables.contains_key(&id) {
            return Err(StoreError::timetable_not_found(id));
        }
        let appointments = state
            .appointments
            .values()
            .filter(|a| a.timetable_id == id)
            .count() as u64;
        if appointments > 0 {
            return Err(StoreError::InUse {
                timetable_id: id,
                appointments,
            });
        }
        state.timetables.remove(&id);
        Ok(())
    }

    async fn delete_timetable_with_appointments(&self, id: i64) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        if state.timetables.remove(&id).is_none() {
            return Err(StoreError::timetable_not_found(id));
        }
        let before = state.appointments.len();
        state.appointments.retain(|_, a| a.timetable_id != id);
        Ok((before - state.appointments.len()) as u64)
    }

    async fn list_timetables(&self, offset: u32, limit: u32) -> StoreResult<Vec<Timetable>> {
        let state = self.state.read().await;
        Ok(state
            .timetables
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_appointments(&self, timetable_id: i64) -> StoreResult<Vec<Appointment>> {
        let state = self.state.read().await;
        let mut appointments: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|a| a.timetable_id == timetable_id)
            .cloned()
            .collect();
        appointments.sort_by_key(|a| a.appointment_time);
        Ok(appointments)
    }

    async fn get_appointment(&self, id: i64) -> StoreResult<Appointment> {
        let state = self.state.read().await;
        state
            .appointments
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::appointment_not_found(id))
    }

    async fn create_appointment(&self, new: &NewAppointment) -> StoreResult<Appointment> {
        let mut state = self.state.write().await;
        let timetable = state
            .timetables
            .get(&new.timetable_id)
            .ok_or_else(|| StoreError::timetable_not_found(new.timetable_id))?;
        if !timetable.covers(new.appointment_time) {
            return Err(StoreError::OutsideWindow {
                timetable_id: new.timetable_id,
                time: new.appointment_time,
            });
        }
        let taken = state.appointments.values().any(|a| {
            a.timetable_id == new.timetable_id && a.appointment_time == new.appointment_time
        });
        if taken {
            return Err(StoreError::SlotTaken {
                timetable_id: new.timetable_id,
                time: new.appointment_time,
            });
        }

        state.last_appointment_id += 1;
        let appointment = Appointment {
            id: state.last_appointment_id,
            timetable_id: new.timetable_id,
            user_id: new.user_id,
            appointment_time: new.appointment_time,
            created_at: Utc::now(),
        };
        state.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn delete_appointment(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state
            .appointments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::appointment_not_found(id))
    }
}
