//! Purchasing domain module (purchase orders).
//!
//! This crate contains business rules for purchase orders, implemented purely as
//! deterministic domain logic (no IO, no storage, no clock reads).

pub mod document;
pub mod item;
pub mod kpi;
pub mod ledger;
pub mod order;
pub mod status;

pub use document::{PaymentStatus, PurchaseInvoice, PurchaseReceipt};
pub use item::{NewItem, PurchaseOrderItem, DEFAULT_UNIT};
pub use kpi::{ProcurementKpi, StatusCount};
pub use ledger::{LedgerError, LedgerTotals};
pub use order::{
    AddItem, Approve, Cancel, CreatePurchaseOrder, GoodsReceived, InvoicePosted, PoNumber,
    PostInvoice, PurchaseOrder, PurchaseOrderApproved, PurchaseOrderCancelled,
    PurchaseOrderCommand, PurchaseOrderCreated, PurchaseOrderEvent, PurchaseOrderItemAdded,
    PurchaseOrderRejected, PurchaseOrderSubmitted, ReceiveGoods, Reject, Submit, SupplierRef,
};
pub use status::PurchaseOrderStatus;
