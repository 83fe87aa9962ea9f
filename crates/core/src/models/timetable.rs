use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{SchedulingError, SchedulingResult};

/// A bookable window for a doctor in a hospital room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    pub id: i64,
    pub hospital_id: i64,
    pub doctor_id: i64,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub room: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timetable {
    /// Returns true when `instant` lies inside `[from, to]`, bounds included.
    pub fn covers(&self, instant: DateTime<Utc>) -> bool {
        self.from <= instant && instant <= self.to
    }
}

/// The caller-supplied fields of a timetable, used both to create one and to
/// overwrite an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableDraft {
    pub hospital_id: i64,
    pub doctor_id: i64,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub room: String,
}

impl TimetableDraft {
    pub fn validate(&self) -> SchedulingResult<()> {
        if self.from >= self.to {
            return Err(SchedulingError::InvalidTimeRange(format!(
                "from ({}) must be before to ({})",
                self.from, self.to
            )));
        }
        if self.hospital_id <= 0 {
            return Err(SchedulingError::InvalidInput(
                "hospital_id must be a positive identifier".to_string(),
            ));
        }
        if self.doctor_id <= 0 {
            return Err(SchedulingError::InvalidInput(
                "doctor_id must be a positive identifier".to_string(),
            ));
        }
        if self.room.trim().is_empty() {
            return Err(SchedulingError::InvalidInput(
                "room must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request body for creating or replacing a timetable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableRequest {
    pub hospital_id: i64,
    pub doctor_id: i64,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub room: String,
}

impl From<TimetableRequest> for TimetableDraft {
    fn from(req: TimetableRequest) -> Self {
        Self {
            hospital_id: req.hospital_id,
            doctor_id: req.doctor_id,
            from: req.from,
            to: req.to,
            room: req.room,
        }
    }
}
