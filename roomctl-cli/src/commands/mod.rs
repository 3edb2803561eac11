//! Command implementations for the roomctl CLI

pub mod db;
pub mod serve;

pub use db::run_db;
pub use serve::run_serve;
