/// Caller authentication extractors
pub mod auth;
/// Domain error to HTTP response mapping
pub mod error_handling;
