//! # Scheduling Core
//!
//! Domain types, error taxonomy and the scheduling engine for the hospital
//! timetable service. Persistence and credential verification are reached
//! through the [`store::ScheduleStore`] and [`identity::IdentityVerifier`]
//! traits so that the engine stays independent of PostgreSQL and HTTP.

pub mod engine;
pub mod errors;
pub mod identity;
pub mod models;
pub mod store;

pub use engine::{DeletePolicy, EngineConfig, SchedulingEngine};
