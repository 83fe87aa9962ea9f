//! # Hospital Scheduling API
//!
//! The API crate provides the web server for the hospital scheduling service.
//! It exposes doctors' timetables and the appointments booked inside them.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into [`SchedulingEngine`] calls
//! - **Middleware**: Caller authentication and error mapping
//! - **Identity**: Verification of bearer credentials issued by the account service
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework. Persistence sits behind the
//! [`ScheduleStore`] trait, so the server runs on PostgreSQL or in memory.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Bearer credential verifiers
pub mod identity;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, header},
};
use eyre::{Result, WrapErr};
use scheduling_core::{SchedulingEngine, identity::IdentityVerifier, store::ScheduleStore};
use tokio::{net::TcpListener, signal};
use tower::{ServiceBuilder, timeout::TimeoutLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub engine: SchedulingEngine,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl ApiState {
    pub fn new(engine: SchedulingEngine, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { engine, verifier }
    }
}

/// Installs the global `tracing` subscriber.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the application router with all routes attached to `state`.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Timetable management endpoints
        .merge(routes::timetable::routes())
        // Appointment booking endpoints
        .merge(routes::appointment::routes())
        .layer(TraceLayer::new_for_http())
        // Attach shared state to all routes
        .with_state(state)
}

/// Fails requests that run longer than `timeout` with a `request_timeout` error body.
pub fn with_request_timeout(app: Router, timeout: Duration) -> Router {
    app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(
                middleware::error_handling::handle_middleware_error,
            ))
            .layer(TimeoutLayer::new(timeout)),
    )
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin '{}'", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Starts the API server on top of the given store
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use scheduling_api::{config::ApiConfig, start_server};
/// # use scheduling_db::MemoryStore;
/// # async fn run() -> eyre::Result<()> {
/// let config = ApiConfig::from_env()?;
/// start_server(config, Arc::new(MemoryStore::new())).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn ScheduleStore>) -> Result<()> {
    let verifier = identity::build_verifier(&config.identity)?;
    let engine = SchedulingEngine::new(store, config.engine_config());
    let state = Arc::new(ApiState::new(engine, verifier));

    let app = router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) if !origins.is_empty() => app.layer(cors_layer(origins)?),
        _ => app,
    };

    // Add request timeout middleware
    let app = with_request_timeout(app, Duration::from_secs(config.request_timeout));

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", addr))?;
    info!(
        delete_policy = %config.delete_policy,
        "Server listening on http://{}", addr
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
