//! roomctl-server: persistence, administration and HTTP API
//!
//! - [`db`]: connection pool, database administration, repositories
//! - [`migrations`]: versioned SQL files applied in order
//! - [`seeds`]: idempotent sample data
//! - [`usecases`]: per-entity services used by the HTTP layer
//! - [`http`]: axum router and server
//!
//! The pool is created by the caller and passed in; nothing here holds a
//! global connection.

pub mod db;
pub mod http;
pub mod migrations;
pub mod seeds;
pub mod usecases;

#[cfg(test)]
pub(crate) mod test_support;

pub use db::{close_pool, create_pool, ping, DbError};
pub use http::{run_server, ServerConfig};
pub use migrations::{Direction, MigrationReport, MigrationRunner, MigrationSource, MigrationStatus};
pub use seeds::{SeedOutcome, SeedRunner};
