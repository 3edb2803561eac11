//! Versioned SQL migrations
//!
//! Files named `<14-digit timestamp>_<description>.sql` are applied once each,
//! in filename order, and recorded by filename in the `migrations` table.
//!
//! The files shipped in `roomctl-server/migrations` are compiled into the
//! binary ([`MigrationSource::Embedded`]); a directory can be used instead.
//!
//! Rollback is metadata-only: [`Direction::Down`] forgets the most recent
//! record but runs no reverse SQL, so the schema is left as it was.

mod embedded;
mod file;
mod runner;

use std::fmt;
use std::path::PathBuf;

pub use embedded::{embedded_migrations, EMBEDDED_MIGRATIONS};
pub use file::{list_migration_files, MigrationFile};
pub use runner::{Direction, MigrationReport, MigrationRunner, MigrationStatus};

/// Where the runner reads migrations from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MigrationSource {
    /// The files under `roomctl-server/migrations`, compiled in
    #[default]
    Embedded,
    /// A directory that must exist
    Dir(PathBuf),
}

impl MigrationSource {
    /// Migrations in filename order.
    pub async fn list(&self) -> Result<Vec<MigrationFile>, MigrationError> {
        match self {
            Self::Embedded => embedded_migrations(),
            Self::Dir(dir) => list_migration_files(dir).await,
        }
    }
}

impl fmt::Display for MigrationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => f.write_str("built-in migrations"),
            Self::Dir(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Migration error type
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("invalid migration filename '{0}' (expected YYYYMMDDHHMMSS_description.sql)")]
    InvalidFilename(String),

    #[error("migrations directory {0} does not exist")]
    MissingDirectory(PathBuf),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("migration {name} failed")]
    Failed {
        name: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("database error")]
    Database(#[from] sqlx::Error),
}
