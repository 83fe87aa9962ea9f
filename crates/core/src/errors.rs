use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures reported by a [`ScheduleStore`](crate::store::ScheduleStore) implementation.
///
/// Backend failures always carry the name of the store operation that failed so
/// they can be logged and retried without losing context.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("timetable {timetable_id} already has an appointment at {time}")]
    SlotTaken {
        timetable_id: i64,
        time: DateTime<Utc>,
    },

    #[error("{time} is outside the window of timetable {timetable_id}")]
    OutsideWindow {
        timetable_id: i64,
        time: DateTime<Utc>,
    },

    #[error("timetable {timetable_id} still has {appointments} appointment(s)")]
    InUse { timetable_id: i64, appointments: u64 },

    #[error("{operation} timed out")]
    Timeout { operation: &'static str },

    #[error("{operation} failed: {source}")]
    Backend {
        operation: &'static str,
        #[source]
        source: eyre::Report,
    },
}

impl StoreError {
    pub fn timetable_not_found(id: i64) -> Self {
        StoreError::NotFound {
            entity: "Timetable",
            id,
        }
    }

    pub fn appointment_not_found(id: i64) -> Self {
        StoreError::NotFound {
            entity: "Appointment",
            id,
        }
    }

    pub fn backend(operation: &'static str, source: impl Into<eyre::Report>) -> Self {
        StoreError::Backend {
            operation,
            source: source.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by an [`IdentityVerifier`](crate::identity::IdentityVerifier).
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("authorization credential required")]
    MissingCredential,

    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Time slot is already taken: {0}")]
    TimeSlotTaken(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Timetable in use: {0}")]
    TimetableInUse(String),

    #[error("Authentication error: {0}")]
    Unauthorized(String),

    #[error("Authorization error: {0}")]
    Forbidden(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("Identity service unavailable: {0}")]
    IdentityUnavailable(String),

    #[error("Request timed out: {0}")]
    RequestTimeout(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SchedulingError {
    /// Stable machine-readable code returned to API callers.
    pub fn code(&self) -> &'static str {
        match self {
            SchedulingError::InvalidInput(_) => "invalid_input",
            SchedulingError::InvalidTimeRange(_) => "invalid_time_range",
            SchedulingError::TimeSlotTaken(_) => "time_slot_taken",
            SchedulingError::NotFound(_) => "not_found",
            SchedulingError::TimetableInUse(_) => "timetable_in_use",
            SchedulingError::Unauthorized(_) => "unauthorized",
            SchedulingError::Forbidden(_) => "forbidden",
            SchedulingError::StoreUnavailable(_) => "store_unavailable",
            SchedulingError::IdentityUnavailable(_) => "identity_unavailable",
            SchedulingError::RequestTimeout(_) => "request_timeout",
            SchedulingError::Internal(_) => "internal",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SchedulingError::StoreUnavailable(_) | SchedulingError::IdentityUnavailable(_)
        )
    }
}

impl From<StoreError> for SchedulingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => SchedulingError::NotFound(err.to_string()),
            StoreError::SlotTaken { .. } => SchedulingError::TimeSlotTaken(err.to_string()),
            StoreError::OutsideWindow { .. } => SchedulingError::InvalidTimeRange(err.to_string()),
            StoreError::InUse { .. } => SchedulingError::TimetableInUse(err.to_string()),
            StoreError::Timeout { .. } | StoreError::Backend { .. } => {
                SchedulingError::StoreUnavailable(err)
            }
        }
    }
}

impl From<AuthError> for SchedulingError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential | AuthError::InvalidCredential(_) => {
                SchedulingError::Unauthorized(err.to_string())
            }
            AuthError::Unavailable(reason) => SchedulingError::IdentityUnavailable(reason),
        }
    }
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;
