//! Database layer - connection pool, administration and repositories
//!
//! # Design Principles
//!
//! - One pool per process, created by the entry point and passed down
//! - Parameterized SQL only; identifiers that cannot be bound are validated
//! - Partial updates via `COALESCE($n, column)`
//! - Transactions scoped to one migration file, one seed batch or one restore

pub mod admin;
pub mod error;
pub mod pool;
pub mod repos;

pub use error::DbError;
pub use pool::{close_pool, connect_options, create_pool, ping};
pub use sqlx::PgPool;
pub use repos::*;
