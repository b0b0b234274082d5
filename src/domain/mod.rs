//! Domain layer - Pure business abstractions
//!
//! Validation rules, trait definitions and domain error types.
//! Nothing here knows about HTTP.

pub mod audit;
pub mod errors;
pub mod isbn;
pub mod repositories;
pub mod validation;

pub use audit::AuditLog;
pub use errors::DomainError;
pub use isbn::is_valid_isbn;
pub use repositories::*;
pub use validation::{BookFields, RawBookFields, ValidationError};
