//! Services Layer
//!
//! This module contains pure business logic extracted from HTTP handlers.
//! Storage and audit output arrive as trait objects.

pub mod book_service;
pub mod transaction_service;

// Re-export for convenience
pub use book_service::*;
pub use transaction_service::*;
