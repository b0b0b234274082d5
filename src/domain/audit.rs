//! Audit sink for request outcomes
//!
//! Services receive the sink explicitly instead of reaching for a global
//! logger, so tests can observe exactly what was recorded.

/// Leveled message sink. Successes go to `info`, rejections and failures to `error`.
pub trait AuditLog: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}
