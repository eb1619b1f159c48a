pub mod action_executor;
pub mod audit_log;

pub use action_executor::{Executor, Outcome};
pub use audit_log::{AuditEntry, AuditLog, AuditLogError};
