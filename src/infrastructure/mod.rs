//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and migrations (db)
//! - HTTP router and server setup (server)
//! - Configuration loading (config)
//! - Repository implementations (repositories)
//! - Tracing-backed audit log (audit)
//! - Application state (state)

pub mod audit;
pub mod config;
pub mod db;
pub mod repositories;
pub mod server;
pub mod state;

pub use audit::TracingAuditLog;
pub use repositories::*;
pub use state::AppState;
