//! `AuditLog` backed by `tracing`

use crate::domain::AuditLog;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn info(&self, message: &str) {
        tracing::info!(target: "booktrack::audit", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "booktrack::audit", "{}", message);
    }
}
