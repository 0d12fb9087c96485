//! Application services shared by several use cases.

pub mod audit_log;

pub use audit_log::AuditLogService;
