//! roomctl-core: domain entities and configuration
//!
//! Shared by the server library and the `roomctl` binary. Nothing in here
//! talks to the database.

pub mod config;
pub mod entities;
pub mod error;

pub use config::{AppConfig, DbConfig, Environment};
pub use entities::*;
pub use error::{CoreError, Result};
