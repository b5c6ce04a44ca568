use std::sync::{Arc, RwLock};

use uuid::Uuid;

use procura_events::{AuditRecord, AuditSink};

/// Append-only audit record storage.
pub trait AuditLog: Send + Sync {
    fn append(&self, record: AuditRecord);

    /// Records for one entity, newest first.
    fn for_entity(&self, entity_id: Uuid) -> Vec<AuditRecord>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L> AuditLog for Arc<L>
where
    L: AuditLog + ?Sized,
{
    fn append(&self, record: AuditRecord) {
        (**self).append(record)
    }

    fn for_entity(&self, entity_id: Uuid) -> Vec<AuditRecord> {
        (**self).for_entity(entity_id)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// In-memory audit log for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    records: RwLock<Vec<AuditRecord>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLog for InMemoryAuditLog {
    fn append(&self, record: AuditRecord) {
        if let Ok(mut records) = self.records.write() {
            records.push(record);
        }
    }

    fn for_entity(&self, entity_id: Uuid) -> Vec<AuditRecord> {
        let records = match self.records.read() {
            Ok(r) => r,
            Err(_) => return vec![],
        };
        records
            .iter()
            .rev()
            .filter(|r| r.entity_id == entity_id)
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }
}

/// Writing straight into the log is a synchronous sink, handy in tests.
impl AuditSink for InMemoryAuditLog {
    fn record(&self, record: AuditRecord) {
        self.append(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use procura_events::AuditAction;

    fn record(action: AuditAction, entity_id: Uuid) -> AuditRecord {
        AuditRecord::new(action, "PurchaseOrder", entity_id, "alice", Utc::now(), action.as_str())
    }

    #[test]
    fn trail_is_per_entity_and_newest_first() {
        let log = InMemoryAuditLog::new();
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();

        log.append(record(AuditAction::PoCreated, a));
        log.append(record(AuditAction::PoCreated, b));
        log.append(record(AuditAction::PoSubmitted, a));

        let trail: Vec<AuditAction> = log.for_entity(a).iter().map(|r| r.action).collect();
        assert_eq!(trail, vec![AuditAction::PoSubmitted, AuditAction::PoCreated]);
        assert_eq!(log.len(), 3);
    }
}
