//! Environment-driven configuration.
//!
//! Variables:
//! - `NODE_ENV`: `development` (default), `production` or `test`
//! - `PORT`: HTTP port (default 3001)
//! - `DATABASE_URL`: full connection string; when set it wins over the
//!   discrete `DB_HOST`/`DB_PORT`/`DB_NAME`/`DB_USER`/`DB_PASSWORD` fields
//! - `DB_POOL_MIN` / `DB_POOL_MAX`: pool bounds (default 2 / 10)

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::{CoreError, Result};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_NAME: &str = "akj_conference_rooms";
pub const DEFAULT_DB_USER: &str = "postgres";
pub const DEFAULT_POOL_MIN: u32 = 2;
pub const DEFAULT_POOL_MAX: u32 = 10;
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(30);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Load `.env` from the current directory without overriding variables that
/// are already set.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded .env from {}", path.display()),
        Err(e) => debug!("No .env loaded: {}", e),
    }
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl FromStr for Environment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(CoreError::UnknownEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Full connection string; overrides the discrete fields when present
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub pool_min: u32,
    pub pool_max: u32,
    pub idle_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            name: DEFAULT_DB_NAME.to_string(),
            user: DEFAULT_DB_USER.to_string(),
            password: String::new(),
            pool_min: DEFAULT_POOL_MIN,
            pool_max: DEFAULT_POOL_MAX,
            idle_timeout: IDLE_TIMEOUT,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

impl DbConfig {
    /// Connection string for external tools such as `pg_dump`.
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgresql://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }

    /// Target database name, taken from `DATABASE_URL` when it names one.
    pub fn database_name(&self) -> &str {
        self.url
            .as_deref()
            .and_then(database_from_url)
            .unwrap_or(&self.name)
    }
}

/// Extract the database segment of a `postgres://.../<db>?params` URL.
fn database_from_url(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let (_, path) = rest.split_once('/')?;
    let db = path.split('?').next().unwrap_or_default();
    (!db.is_empty()).then_some(db)
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    pub db: DbConfig,
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match get("NODE_ENV") {
            Some(v) => v.parse()?,
            None => Environment::default(),
        };

        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT, "expected a port number")?;

        let db = DbConfig {
            url: get("DATABASE_URL"),
            host: get("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
            port: parse_or(
                "DB_PORT",
                get("DB_PORT"),
                DEFAULT_DB_PORT,
                "expected a port number",
            )?,
            name: get("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            user: get("DB_USER").unwrap_or_else(|| DEFAULT_DB_USER.to_string()),
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            pool_min: parse_or(
                "DB_POOL_MIN",
                get("DB_POOL_MIN"),
                DEFAULT_POOL_MIN,
                "expected a connection count",
            )?,
            pool_max: parse_or(
                "DB_POOL_MAX",
                get("DB_POOL_MAX"),
                DEFAULT_POOL_MAX,
                "expected a connection count",
            )?,
            idle_timeout: IDLE_TIMEOUT,
            connect_timeout: CONNECT_TIMEOUT,
        };

        if db.pool_min > db.pool_max {
            return Err(CoreError::invalid_env(
                "DB_POOL_MIN",
                db.pool_min.to_string(),
                "must not exceed DB_POOL_MAX",
            ));
        }
        if db.pool_max == 0 {
            return Err(CoreError::invalid_env(
                "DB_POOL_MAX",
                "0",
                "must be at least 1",
            ));
        }

        Ok(Self {
            environment,
            port,
            db,
        })
    }
}

fn parse_or<T: FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: T,
    reason: &'static str,
) -> Result<T> {
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| CoreError::invalid_env(var, v, reason)),
        None => Ok(default),
    }
}
