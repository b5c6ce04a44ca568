use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::Utc;
use procura_auth::{Actor, Role};
use procura_core::{Money, SupplierId, UserId};
use procura_events::NoopAuditSink;
use procura_infra::order_store::{InMemoryOrderStore, OrderStore};
use procura_infra::sequence::{InMemoryPoSequence, PoNumberAllocator};
use procura_infra::suppliers::InMemorySupplierDirectory;
use procura_infra::{CreateOrderRequest, PostInvoiceRequest, ReceiveGoodsRequest, WorkflowEngine};
use procura_purchasing::{LedgerTotals, NewItem};
use std::sync::Arc;

type BenchEngine = WorkflowEngine<
    Arc<InMemoryOrderStore>,
    NoopAuditSink,
    Arc<InMemorySupplierDirectory>,
    InMemoryPoSequence<Arc<InMemoryOrderStore>>,
>;

fn setup() -> (BenchEngine, SupplierId, Actor, Actor) {
    let store = Arc::new(InMemoryOrderStore::new());
    let suppliers = Arc::new(InMemorySupplierDirectory::new());
    let supplier_id = suppliers.register("Acme Office Supply").id;
    let allocator = InMemoryPoSequence::new(store.clone(), 1000);
    let engine = WorkflowEngine::new(store, NoopAuditSink, suppliers, allocator);
    let coordinator = Actor::new(UserId::new(), "carol", "Carol", Role::ProcurementCoordinator);
    let manager = Actor::new(UserId::new(), "mike", "Mike", Role::PurchasingManager);
    (engine, supplier_id, coordinator, manager)
}

fn items(lines: usize) -> Vec<NewItem> {
    (0..lines)
        .map(|n| {
            NewItem::new(
                format!("Item {n}"),
                "10".parse().unwrap(),
                "2.5000".parse().unwrap(),
            )
        })
        .collect()
}

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

fn bench_create_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_latency");

    for lines in [1usize, 10, 100] {
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::new("lines", lines), &lines, |b, &lines| {
            let (engine, supplier_id, coordinator, _) = setup();
            b.iter(|| {
                engine
                    .create(
                        &coordinator,
                        CreateOrderRequest {
                            supplier_id,
                            order_date: None,
                            expected_delivery_date: None,
                            remarks: None,
                            items: black_box(items(lines)),
                        },
                    )
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_full_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_lifecycle");

    // create -> submit -> approve -> receive x2 -> invoice
    group.bench_function("create_to_completed", |b| {
        let (engine, supplier_id, coordinator, manager) = setup();
        let mut invoice_seq = 0u64;
        b.iter(|| {
            let po = engine
                .create(
                    &coordinator,
                    CreateOrderRequest {
                        supplier_id,
                        order_date: None,
                        expected_delivery_date: None,
                        remarks: None,
                        items: items(4),
                    },
                )
                .unwrap();
            let id = po.id_typed();
            engine.submit(&coordinator, id).unwrap();
            engine.approve(&manager, id).unwrap();
            for amount in ["60.00", "40.00"] {
                engine
                    .receive_goods(
                        &coordinator,
                        id,
                        ReceiveGoodsRequest {
                            amount: money(amount),
                            receipt_date: None,
                            notes: None,
                        },
                    )
                    .unwrap();
            }
            invoice_seq += 1;
            let done = engine
                .post_invoice(
                    &coordinator,
                    id,
                    PostInvoiceRequest {
                        invoice_number: format!("INV-{invoice_seq}"),
                        invoice_date: Utc::now().date_naive(),
                        due_date: None,
                        amount: money("100.00"),
                        notes: None,
                    },
                )
                .unwrap();
            black_box(done);
        });
    });

    group.finish();
}

fn bench_allocator_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocator_throughput");
    group.throughput(Throughput::Elements(1));

    group.bench_function("next_empty_store", |b| {
        let allocator = InMemoryPoSequence::new(Arc::new(InMemoryOrderStore::new()), 1000);
        b.iter(|| black_box(allocator.next(Utc::now()).unwrap()));
    });

    group.finish();
}

fn bench_ledger_checks(c: &mut Criterion) {
    let totals = LedgerTotals {
        grand_total: money("100000.00"),
        total_received: money("99999.00"),
        total_billed: money("12345.67"),
    };

    c.bench_function("ledger_apply_receipt", |b| {
        b.iter(|| black_box(totals.apply_receipt(black_box(money("0.50")))))
    });
    c.bench_function("ledger_billed_percent", |b| {
        b.iter(|| black_box(totals.billed_percent()))
    });
}

fn bench_search(c: &mut Criterion) {
    let (engine, supplier_id, coordinator, _) = setup();
    for _ in 0..1000 {
        engine
            .create(
                &coordinator,
                CreateOrderRequest {
                    supplier_id,
                    order_date: None,
                    expected_delivery_date: None,
                    remarks: None,
                    items: items(2),
                },
            )
            .unwrap();
    }

    c.bench_function("search_1000_orders", |b| {
        b.iter(|| {
            black_box(
                engine
                    .store()
                    .search(black_box("po-"), Default::default())
                    .unwrap(),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_create_latency,
    bench_full_lifecycle,
    bench_allocator_throughput,
    bench_ledger_checks,
    bench_search
);
criterion_main!(benches);
