//! Order-management console harness for PostgreSQL.
//!
//! The crate drives a three-phase demo against a single database:
//! schema migration (embedded engine with a manual script fallback),
//! a transactional CRUD scenario, and a catalog of labeled SQL
//! statements rendered as bordered console tables.
//!
//! All demo output goes to stdout with fixed Russian text; operational
//! diagnostics go through `tracing`.

pub mod catalog;
pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod migrate;
pub mod model;
pub mod render;
pub mod repo;
pub mod runner;
pub mod scenario;

pub use config::DbConfig;
pub use db::Session;
pub use error::{HarnessError, Result};
pub use render::RenderedTable;
