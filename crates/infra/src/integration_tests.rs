//! Integration tests for the full workflow pipeline.
//!
//! Tests: request → WorkflowEngine → OrderStore → AuditSink → AuditWorker → AuditLog
//!
//! Verifies:
//! - A full lifecycle lands in the store and in the audit trail
//! - Optimistic concurrency lets exactly one writer win per version
//! - PO numbers stay unique under concurrent allocation

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};
    use std::thread;

    use chrono::Utc;

    use procura_auth::{IdentityProvider, InMemoryIdentityProvider, Role};
    use procura_core::{execute, AggregateRoot, ErrorKind, Money};
    use procura_events::AuditAction;
    use procura_purchasing::{PurchaseOrderCommand, PurchaseOrderStatus, Submit};

    use crate::audit::{AuditLog, AuditWorker, InMemoryAuditLog};
    use crate::config::ProcurementConfig;
    use crate::order_store::{InMemoryOrderStore, OrderStore, OrderStoreError};
    use crate::sequence::{InMemoryPoSequence, PoNumberAllocator};
    use crate::suppliers::InMemorySupplierDirectory;
    use crate::test_support::{draft_order, items_worth_100};
    use crate::workflow::{
        CreateOrderRequest, PostInvoiceRequest, ReceiveGoodsRequest, WorkflowEngine,
    };

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn create_request(supplier_id: procura_core::SupplierId) -> CreateOrderRequest {
        CreateOrderRequest {
            supplier_id,
            order_date: None,
            expected_delivery_date: None,
            remarks: Some("Q3 office restock".to_string()),
            items: items_worth_100(),
        }
    }

    #[test]
    fn lifecycle_reaches_completed_and_audit_worker_records_it() {
        let config = ProcurementConfig::default();
        let _ = config.init_tracing();
        let identities = InMemoryIdentityProvider::new();
        identities.register("carol", "Carol Coordinator", Role::ProcurementCoordinator);
        identities.register("mike", "Mike Manager", Role::PurchasingManager);
        identities.register("fran", "Fran Finance", Role::Finance);

        let store = Arc::new(InMemoryOrderStore::new());
        let log = Arc::new(InMemoryAuditLog::new());
        let (sink, worker) = AuditWorker::spawn(
            config.audit_worker_name.clone(),
            config.audit_queue_capacity,
            log.clone(),
        )
        .unwrap();
        let suppliers = Arc::new(InMemorySupplierDirectory::new());
        let supplier = suppliers.register("Acme Office Supply");
        let allocator = InMemoryPoSequence::new(store.clone(), config.po_sequence_floor);
        let engine = WorkflowEngine::new(store.clone(), sink, suppliers, allocator);

        let carol = identities.resolve("carol").unwrap();
        let mike = identities.resolve("mike").unwrap();
        let fran = identities.resolve("fran").unwrap();

        let po = engine.create(&carol, create_request(supplier.id)).unwrap();
        let id = po.id_typed();
        engine.submit(&carol, id).unwrap();
        engine.approve(&mike, id).unwrap();
        engine
            .receive_goods(
                &carol,
                id,
                ReceiveGoodsRequest {
                    amount: money("60"),
                    receipt_date: None,
                    notes: Some("first pallet".to_string()),
                },
            )
            .unwrap();
        engine
            .receive_goods(
                &carol,
                id,
                ReceiveGoodsRequest {
                    amount: money("40"),
                    receipt_date: None,
                    notes: None,
                },
            )
            .unwrap();
        let done = engine
            .post_invoice(
                &fran,
                id,
                PostInvoiceRequest {
                    invoice_number: "ACME-5521".to_string(),
                    invoice_date: Utc::now().date_naive(),
                    due_date: None,
                    amount: money("100.00"),
                    notes: None,
                },
            )
            .unwrap();

        assert_eq!(done.status(), PurchaseOrderStatus::Completed);
        assert_eq!(done.receipts().len(), 2);
        assert_eq!(done.receipts()[0].notes.as_deref(), Some("first pallet"));
        assert_eq!(store.load_by_id(id).unwrap(), Some(done.clone()));

        // Dropping the engine closes the channel; shutdown flushes the rest.
        drop(engine);
        worker.shutdown();

        let trail = log.for_entity((*done.id()).into());
        assert_eq!(trail.len(), 6);
        assert_eq!(trail[0].action, AuditAction::PoBilled);
        assert_eq!(trail[5].action, AuditAction::PoCreated);
        assert_eq!(trail[3].description, "PO approved by Mike Manager");
    }

    #[test]
    fn concurrent_saves_from_same_snapshot_exactly_one_wins() {
        let store = Arc::new(InMemoryOrderStore::new());
        let snapshot = store.save(&draft_order("PO-2026-1001")).unwrap();
        let initial = snapshot.version();

        let writers = 2;
        let barrier = Arc::new(Barrier::new(writers));
        let handles: Vec<_> = (0..writers)
            .map(|_| {
                let store = store.clone();
                let barrier = barrier.clone();
                let mut po = snapshot.clone();
                thread::spawn(move || {
                    let order_id = po.id_typed();
                    execute(
                        &mut po,
                        &PurchaseOrderCommand::Submit(Submit {
                            order_id,
                            occurred_at: Utc::now(),
                        }),
                    )
                    .unwrap();
                    barrier.wait();
                    store.save(&po)
                })
            })
            .collect();

        let results: Vec<Result<_, OrderStoreError>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let wins = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(OrderStoreError::Concurrency(_))))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(conflicts, 1);

        let stored = store.load_by_id(snapshot.id_typed()).unwrap().unwrap();
        assert_eq!(stored.version(), initial + 1);
        assert_eq!(stored.status(), PurchaseOrderStatus::Submitted);
    }

    #[test]
    fn concurrent_receipts_all_land_when_callers_retry() {
        let store = Arc::new(InMemoryOrderStore::new());
        let log = Arc::new(InMemoryAuditLog::new());
        let suppliers = Arc::new(InMemorySupplierDirectory::new());
        let supplier = suppliers.register("Globex");
        let allocator = InMemoryPoSequence::new(store.clone(), 1000);
        let engine = Arc::new(WorkflowEngine::new(store, log.clone(), suppliers, allocator));

        let identities = InMemoryIdentityProvider::new();
        let carol = identities.register("carol", "Carol Coordinator", Role::ProcurementCoordinator);
        let admin = identities.register("root", "Ada Admin", Role::Admin);

        let po = engine.create(&carol, create_request(supplier.id)).unwrap();
        let id = po.id_typed();
        engine.submit(&carol, id).unwrap();
        let approved = engine.approve(&admin, id).unwrap();

        let writers = 8usize;
        let barrier = Arc::new(Barrier::new(writers));
        let handles: Vec<_> = (0..writers)
            .map(|_| {
                let engine = engine.clone();
                let barrier = barrier.clone();
                let carol = carol.clone();
                thread::spawn(move || {
                    barrier.wait();
                    loop {
                        let request = ReceiveGoodsRequest {
                            amount: "10".parse().unwrap(),
                            receipt_date: None,
                            notes: None,
                        };
                        match engine.receive_goods(&carol, id, request) {
                            Ok(_) => break,
                            Err(err) if err.is_retryable() => continue,
                            Err(err) => panic!("unexpected error: {err}"),
                        }
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let po = engine.get(id).unwrap();
        assert_eq!(po.total_received(), money("80.00"));
        assert_eq!(po.receipts().len(), writers);
        assert_eq!(po.version(), approved.version() + writers as u64);
        assert_eq!(po.status(), PurchaseOrderStatus::ToReceive);

        let receipts = log
            .for_entity((*po.id()).into())
            .iter()
            .filter(|r| r.action == AuditAction::PoReceived)
            .count();
        assert_eq!(receipts, writers);

        let numbers: HashSet<&str> = po.receipts().iter().map(|r| r.receipt_number.as_str()).collect();
        assert_eq!(numbers.len(), writers);
    }

    #[test]
    fn allocator_hands_out_unique_numbers_across_threads() {
        let store = Arc::new(InMemoryOrderStore::new());
        let allocator = Arc::new(InMemoryPoSequence::new(store, 1000));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let allocator = allocator.clone();
                thread::spawn(move || {
                    (0..50)
                        .map(|_| allocator.next(Utc::now()).unwrap().to_string())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for number in h.join().unwrap() {
                assert!(seen.insert(number), "duplicate PO number allocated");
            }
        }
        assert_eq!(seen.len(), 400);
        assert_eq!(allocator.current(), 1400);
    }

    #[test]
    fn over_billing_is_rejected_end_to_end() {
        let store = Arc::new(InMemoryOrderStore::new());
        let log = Arc::new(InMemoryAuditLog::new());
        let suppliers = Arc::new(InMemorySupplierDirectory::new());
        let supplier = suppliers.register("Initech");
        let allocator = InMemoryPoSequence::new(store.clone(), 1000);
        let engine = WorkflowEngine::new(store, log.clone(), suppliers, allocator);

        let identities = InMemoryIdentityProvider::new();
        let carol = identities.register("carol", "Carol Coordinator", Role::ProcurementCoordinator);
        let mike = identities.register("mike", "Mike Manager", Role::PurchasingManager);

        let po = engine.create(&carol, create_request(supplier.id)).unwrap();
        engine.submit(&carol, po.id_typed()).unwrap();
        engine.approve(&mike, po.id_typed()).unwrap();
        let audited = log.len();

        let err = engine
            .post_invoice(
                &carol,
                po.id_typed(),
                PostInvoiceRequest {
                    invoice_number: "INI-1".to_string(),
                    invoice_date: Utc::now().date_naive(),
                    due_date: None,
                    amount: money("100.01"),
                    notes: None,
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::BusinessRuleViolation));
        assert_eq!(log.len(), audited);
        assert_eq!(engine.get(po.id_typed()).unwrap().status(), PurchaseOrderStatus::Approved);
    }
}
