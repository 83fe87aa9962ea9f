//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the scheduling API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Whole-request timeout (default: 30)
//! - `STORE_BACKEND`: `postgres` or `memory` (default: "postgres")
//! - `DATABASE_URL`: PostgreSQL connection string (required for the postgres backend)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
//! - `STORE_TIMEOUT_MS`: Bound on each store call (default: 5000)
//! - `TIMETABLE_DELETE_POLICY`: `cascade`, `reject` or `orphan` (default: "cascade")
//! - `IDENTITY_MODE`: `jwt` or `remote` (default: "jwt")
//! - `JWT_SECRET`: Shared HS256 secret of the account service (required for `jwt`)
//! - `ACCOUNT_SERVICE_URL`: Base URL of the account service (required for `remote`)

use std::{env, fmt, time::Duration};

use eyre::{Result, WrapErr, eyre};
use scheduling_core::{DeletePolicy, EngineConfig};
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// How bearer credentials are verified.
#[derive(Clone, PartialEq, Eq)]
pub enum IdentityConfig {
    /// Verify HS256 tokens locally with the account service's signing secret.
    Jwt { secret: String },
    /// Ask the account service to validate each token.
    Remote {
        account_service_url: String,
        timeout: Duration,
    },
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityConfig::Jwt { .. } => f
                .debug_struct("Jwt")
                .field("secret", &"<redacted>")
                .finish(),
            IdentityConfig::Remote {
                account_service_url,
                timeout,
            } => f
                .debug_struct("Remote")
                .field("account_service_url", account_service_url)
                .field("timeout", timeout)
                .finish(),
        }
    }
}

/// Configuration for the scheduling API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use scheduling_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    pub store_backend: StoreBackend,

    /// PostgreSQL database connection string
    pub database_url: Option<String>,

    pub database_max_connections: u32,

    /// Bound on each individual store call
    pub store_timeout: Duration,

    pub delete_policy: DeletePolicy,

    pub identity: IdentityConfig,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `DATABASE_URL` is not set while the postgres backend is selected
    /// - `JWT_SECRET` / `ACCOUNT_SERVICE_URL` is missing for the selected identity mode
    /// - a numeric or enumerated value cannot be parsed
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Network settings
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Logging settings
        let log_level = match lookup("LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .wrap_err("Invalid API_REQUEST_TIMEOUT_SECONDS value")?;

        // Storage settings
        let store_backend = match lookup("STORE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => return Err(eyre!("Invalid STORE_BACKEND value '{}'", other)),
        };

        let database_url = lookup("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(eyre!("DATABASE_URL environment variable must be set"));
        }

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .wrap_err("Invalid DATABASE_MAX_CONNECTIONS value")?;

        let store_timeout = lookup("STORE_TIMEOUT_MS")
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .map(Duration::from_millis)
            .wrap_err("Invalid STORE_TIMEOUT_MS value")?;

        let delete_policy = match lookup("TIMETABLE_DELETE_POLICY") {
            Some(raw) => raw
                .parse()
                .map_err(|e: String| eyre!(e))
                .wrap_err("Invalid TIMETABLE_DELETE_POLICY value")?,
            None => DeletePolicy::default(),
        };

        // Security settings
        let identity = match lookup("IDENTITY_MODE")
            .unwrap_or_else(|| "jwt".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "jwt" => IdentityConfig::Jwt {
                secret: lookup("JWT_SECRET")
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| eyre!("JWT_SECRET must be set when IDENTITY_MODE=jwt"))?,
            },
            "remote" => IdentityConfig::Remote {
                account_service_url: lookup("ACCOUNT_SERVICE_URL").ok_or_else(|| {
                    eyre!("ACCOUNT_SERVICE_URL must be set when IDENTITY_MODE=remote")
                })?,
                timeout: store_timeout,
            },
            other => return Err(eyre!("Invalid IDENTITY_MODE value '{}'", other)),
        };

        Ok(Self {
            host,
            port,
            log_level,
            cors_origins,
            request_timeout,
            store_backend,
            database_url,
            database_max_connections,
            store_timeout,
            delete_policy,
            identity,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            store_timeout: self.store_timeout,
            delete_policy: self.delete_policy,
        }
    }
}
