//! Audit trail records and the sink they are handed to.
//!
//! The workflow produces exactly one [`AuditRecord`] per successful state or
//! totals change and passes it to an [`AuditSink`]. Recording is one-way:
//! `record` returns nothing, so a lost record can never fail an operation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of audited action.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    PoCreated,
    PoUpdated,
    PoSubmitted,
    PoApproved,
    PoRejected,
    PoReceived,
    PoBilled,
    PoCancelled,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::PoCreated => "PO_CREATED",
            AuditAction::PoUpdated => "PO_UPDATED",
            AuditAction::PoSubmitted => "PO_SUBMITTED",
            AuditAction::PoApproved => "PO_APPROVED",
            AuditAction::PoRejected => "PO_REJECTED",
            AuditAction::PoReceived => "PO_RECEIVED",
            AuditAction::PoBilled => "PO_BILLED",
            AuditAction::PoCancelled => "PO_CANCELLED",
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only audit trail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub record_id: Uuid,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub performed_by: String,
    pub performed_at: DateTime<Utc>,
    pub previous_status: Option<String>,
    pub new_status: Option<String>,
    pub description: String,
}

impl AuditRecord {
    pub fn new(
        action: AuditAction,
        entity_type: impl Into<String>,
        entity_id: Uuid,
        performed_by: impl Into<String>,
        performed_at: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            record_id: Uuid::now_v7(),
            action,
            entity_type: entity_type.into(),
            entity_id,
            performed_by: performed_by.into(),
            performed_at,
            previous_status: None,
            new_status: None,
            description: description.into(),
        }
    }

    pub fn with_previous_status(mut self, status: impl ToString) -> Self {
        self.previous_status = Some(status.to_string());
        self
    }

    pub fn with_new_status(mut self, status: impl ToString) -> Self {
        self.new_status = Some(status.to_string());
        self
    }
}

/// Fire-and-forget audit recorder.
///
/// Implementations must not block the caller on IO and must swallow their own
/// failures (logging them is fine).
pub trait AuditSink: Send + Sync {
    fn record(&self, record: AuditRecord);
}

impl<S> AuditSink for Arc<S>
where
    S: AuditSink + ?Sized,
{
    fn record(&self, record: AuditRecord) {
        (**self).record(record)
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _record: AuditRecord) {}
}
