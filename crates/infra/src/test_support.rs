//! Order fixtures shared by the infra unit tests.

use chrono::{NaiveDate, Utc};

use procura_core::{execute, PurchaseOrderId, SupplierId, UserId};
use procura_purchasing::{
    Approve, CreatePurchaseOrder, NewItem, PoNumber, PostInvoice, PurchaseOrder,
    PurchaseOrderCommand, Submit, SupplierRef,
};

pub(crate) fn items_worth_100() -> Vec<NewItem> {
    vec![
        NewItem::new("Copy paper", "10".parse().unwrap(), "5.00".parse().unwrap()),
        NewItem::new("Toner", "2".parse().unwrap(), "25.00".parse().unwrap()),
    ]
}

pub(crate) fn draft_order(po_number: &str) -> PurchaseOrder {
    draft_order_for(po_number, "Acme Office Supply", None)
}

pub(crate) fn draft_order_for(
    po_number: &str,
    supplier_name: &str,
    expected_delivery_date: Option<NaiveDate>,
) -> PurchaseOrder {
    let order_id = PurchaseOrderId::new();
    let mut po = PurchaseOrder::empty(order_id);
    execute(
        &mut po,
        &PurchaseOrderCommand::CreatePurchaseOrder(CreatePurchaseOrder {
            order_id,
            po_number: PoNumber::new(po_number),
            supplier: SupplierRef {
                id: SupplierId::new(),
                name: supplier_name.to_string(),
            },
            created_by: UserId::new(),
            order_date: None,
            expected_delivery_date,
            remarks: None,
            items: items_worth_100(),
            occurred_at: Utc::now(),
        }),
    )
    .unwrap();
    po
}

pub(crate) fn approve(mut po: PurchaseOrder) -> PurchaseOrder {
    let order_id = po.id_typed();
    execute(
        &mut po,
        &PurchaseOrderCommand::Submit(Submit {
            order_id,
            occurred_at: Utc::now(),
        }),
    )
    .unwrap();
    execute(
        &mut po,
        &PurchaseOrderCommand::Approve(Approve {
            order_id,
            approved_by: UserId::new(),
            occurred_at: Utc::now(),
        }),
    )
    .unwrap();
    po
}

pub(crate) fn post_invoice(mut po: PurchaseOrder, invoice_number: &str, amount: &str) -> PurchaseOrder {
    let order_id = po.id_typed();
    execute(
        &mut po,
        &PurchaseOrderCommand::PostInvoice(PostInvoice {
            order_id,
            invoice_number: invoice_number.to_string(),
            invoice_date: Utc::now().date_naive(),
            due_date: None,
            amount: amount.parse().unwrap(),
            notes: None,
            posted_by: UserId::new(),
            occurred_at: Utc::now(),
        }),
    )
    .unwrap();
    po
}
