//! Audit trail delivery and storage.
//!
//! The workflow hands records to a [`ChannelAuditSink`]; a background
//! [`AuditWorker`] drains the channel into an [`AuditLog`].

pub mod log;
pub mod worker;

pub use log::{AuditLog, InMemoryAuditLog};
pub use worker::{AuditWorker, AuditWorkerHandle, ChannelAuditSink};
