//! Domain events and the audit trail contract.

pub mod audit;
pub mod event;

pub use audit::{AuditAction, AuditRecord, AuditSink, NoopAuditSink};
pub use event::Event;
