//! Receipts and invoices recorded against a purchase order.
//!
//! Both are immutable once created and only ever appended to their order.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use procura_core::{Money, UserId};

/// Goods received against a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub receipt_number: String,
    pub receipt_date: NaiveDate,
    pub received_amount: Money,
    pub received_by: UserId,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Settlement state of a supplier invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

/// Supplier bill posted against a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseInvoice {
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub invoice_amount: Money,
    pub payment_status: PaymentStatus,
    pub posted_by: UserId,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Receipt numbers are `REC-<po number>-<nn>`, `nn` being the 1-based
/// position of the receipt on its order.
pub fn receipt_number(po_number: &str, position: usize) -> String {
    format!("REC-{po_number}-{position:02}")
}
