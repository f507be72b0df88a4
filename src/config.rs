//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Missing or malformed numeric and
//! boolean values fall back to defaults; values the service cannot run
//! without a correct form of (bind address, database URL, SSL mode) are
//! reported as [`ConfigError`].

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Configuration values that could not be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `SERVER_HOST` is not an IP address.
    #[error("invalid SERVER_HOST {0:?}")]
    InvalidHost(String),

    /// `DATABASE_URL` is not a PostgreSQL connection URL.
    #[error("invalid DATABASE_URL: {0}")]
    InvalidDatabaseUrl(#[source] sqlx::Error),

    /// `DB_SSLMODE` is not a libpq SSL mode.
    #[error("invalid DB_SSLMODE {0:?}")]
    InvalidSslMode(String),
}

/// Deployment environment, which selects the log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Human-readable logs.
    Development,
    /// JSON logs.
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") || value.eq_ignore_ascii_case("prod") {
            Self::Production
        } else {
            Self::Development
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// PostgreSQL connection and pool settings.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Parsed connection options, from `DATABASE_URL` or the `DB_*` keys.
    pub connect_options: PgConnectOptions,

    /// Maximum number of database connections in the pool.
    pub max_connections: u32,

    /// Minimum idle connections in the pool.
    pub min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub connect_timeout_secs: u64,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.connect_options.get_host())
            .field("port", &self.connect_options.get_port())
            .field("database", &self.connect_options.get_database())
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish_non_exhaustive()
    }
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`ServiceConfig::from_env`].
#[derive(Clone)]
pub struct ServiceConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// Database settings.
    pub database: DatabaseConfig,

    /// Master switch for PostgreSQL; when off, records live in memory.
    pub persistence_enabled: bool,

    /// Per-request deadline in seconds.
    pub request_timeout_secs: u64,

    /// Seconds in-flight requests get to finish after a shutdown signal.
    pub shutdown_grace_secs: u64,

    /// Token signing secret. Loaded for parity with deployments that set
    /// it; no endpoint enforces authentication.
    pub jwt_secret: String,

    /// Deployment environment.
    pub environment: Environment,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("listen_addr", &self.listen_addr)
            .field("database", &self.database)
            .field("persistence_enabled", &self.persistence_enabled)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("shutdown_grace_secs", &self.shutdown_grace_secs)
            .field("jwt_secret", &"<redacted>")
            .field("environment", &self.environment)
            .finish()
    }
}

impl ServiceConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` first so a `.env` file is optional.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `SERVER_HOST`, `DATABASE_URL`, or
    /// `DB_SSLMODE` is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServiceConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = get("SERVER_HOST", "0.0.0.0");
        let ip = IpAddr::from_str(&host).map_err(|_| ConfigError::InvalidHost(host.clone()))?;
        let port = parse_value(lookup("SERVER_PORT"), 8080u16);
        let listen_addr = SocketAddr::new(ip, port);

        let connect_options = match lookup("DATABASE_URL") {
            Some(url) => PgConnectOptions::from_str(&url).map_err(ConfigError::InvalidDatabaseUrl)?,
            None => {
                let ssl_mode = get("DB_SSLMODE", "disable");
                let ssl_mode = PgSslMode::from_str(&ssl_mode)
                    .map_err(|_| ConfigError::InvalidSslMode(ssl_mode.clone()))?;
                PgConnectOptions::new()
                    .host(&get("DB_HOST", "localhost"))
                    .port(parse_value(lookup("DB_PORT"), 5432u16))
                    .username(&get("DB_USER", "john"))
                    .password(&get("DB_PASSWORD", "doe"))
                    .database(&get("DB_NAME", "car_service"))
                    .ssl_mode(ssl_mode)
            }
        };

        let database = DatabaseConfig {
            connect_options,
            max_connections: parse_value(lookup("DATABASE_MAX_CONNECTIONS"), 10),
            min_connections: parse_value(lookup("DATABASE_MIN_CONNECTIONS"), 2),
            connect_timeout_secs: parse_value(lookup("DATABASE_CONNECT_TIMEOUT_SECS"), 5),
        };

        Ok(Self {
            listen_addr,
            database,
            persistence_enabled: parse_bool(lookup("PERSISTENCE_ENABLED"), true),
            request_timeout_secs: parse_value(lookup("REQUEST_TIMEOUT_SECS"), 30),
            shutdown_grace_secs: parse_value(lookup("SHUTDOWN_GRACE_SECS"), 5),
            jwt_secret: get("JWT_SECRET", "your-secret-key"),
            environment: Environment::parse(&get("ENVIRONMENT", "development")),
        })
    }

    /// Per-request deadline.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Drain period after a shutdown signal.
    #[must_use]
    pub const fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Parses an optional raw value as `T`, returning `default` on missing
/// or invalid values.
fn parse_value<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Parses an optional raw value as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_bool(raw: Option<String>, default: bool) -> bool {
    match raw.as_deref().map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
        _ => default,
    }
}
