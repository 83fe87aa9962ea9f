pub mod appointment;
pub mod identity;
pub mod timetable;
