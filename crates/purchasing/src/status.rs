use serde::{Deserialize, Serialize};

/// Purchase order status lifecycle.
///
/// ```text
/// DRAFT -> SUBMITTED -> APPROVED -> TO_RECEIVE / TO_BILL -> COMPLETED
///   ^          |
///   +- reject -+            (any non-terminal) -> CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    Draft,
    Submitted,
    Approved,
    ToReceive,
    ToBill,
    Completed,
    Cancelled,
}

impl PurchaseOrderStatus {
    pub const ALL: [PurchaseOrderStatus; 7] = [
        PurchaseOrderStatus::Draft,
        PurchaseOrderStatus::Submitted,
        PurchaseOrderStatus::Approved,
        PurchaseOrderStatus::ToReceive,
        PurchaseOrderStatus::ToBill,
        PurchaseOrderStatus::Completed,
        PurchaseOrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Draft => "DRAFT",
            PurchaseOrderStatus::Submitted => "SUBMITTED",
            PurchaseOrderStatus::Approved => "APPROVED",
            PurchaseOrderStatus::ToReceive => "TO_RECEIVE",
            PurchaseOrderStatus::ToBill => "TO_BILL",
            PurchaseOrderStatus::Completed => "COMPLETED",
            PurchaseOrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PurchaseOrderStatus::Completed | PurchaseOrderStatus::Cancelled)
    }

    /// Items (and therefore the grand total) may only change here.
    pub fn is_editable(&self) -> bool {
        *self == PurchaseOrderStatus::Draft
    }

    pub fn accepts_receipts(&self) -> bool {
        matches!(self, PurchaseOrderStatus::Approved | PurchaseOrderStatus::ToReceive)
    }

    pub fn accepts_invoices(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Approved | PurchaseOrderStatus::ToReceive | PurchaseOrderStatus::ToBill
        )
    }

    /// Approved and waiting on goods or bills.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Approved | PurchaseOrderStatus::ToReceive | PurchaseOrderStatus::ToBill
        )
    }

    /// Status after a receipt brought the totals to the given state.
    pub fn after_receipt(fully_received: bool, fully_billed: bool) -> Self {
        if fully_received && fully_billed {
            PurchaseOrderStatus::Completed
        } else if fully_received {
            PurchaseOrderStatus::ToBill
        } else {
            PurchaseOrderStatus::ToReceive
        }
    }

    /// Status after an invoice brought the totals to the given state.
    ///
    /// A partial bill on a not-yet-fully-received order keeps the current
    /// status, so an APPROVED order stays APPROVED. This is asymmetric with
    /// [`Self::after_receipt`] and kept as-is pending a product decision.
    pub fn after_invoice(self, fully_received: bool, fully_billed: bool) -> Self {
        if fully_received && fully_billed {
            PurchaseOrderStatus::Completed
        } else if fully_billed {
            PurchaseOrderStatus::ToReceive
        } else {
            self
        }
    }
}

impl core::fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for PurchaseOrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        PurchaseOrderStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == normalized)
            .ok_or_else(|| format!("unknown purchase order status '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PurchaseOrderStatus::*;

    #[test]
    fn receipt_recomputation() {
        assert_eq!(PurchaseOrderStatus::after_receipt(true, true), Completed);
        assert_eq!(PurchaseOrderStatus::after_receipt(true, false), ToBill);
        assert_eq!(PurchaseOrderStatus::after_receipt(false, true), ToReceive);
        assert_eq!(PurchaseOrderStatus::after_receipt(false, false), ToReceive);
    }

    #[test]
    fn invoice_recomputation_keeps_status_on_partial_bill() {
        assert_eq!(Approved.after_invoice(true, true), Completed);
        assert_eq!(Approved.after_invoice(false, true), ToReceive);
        assert_eq!(Approved.after_invoice(false, false), Approved);
        assert_eq!(ToReceive.after_invoice(false, false), ToReceive);
        assert_eq!(ToBill.after_invoice(true, false), ToBill);
    }

    #[test]
    fn status_predicates() {
        assert!(Completed.is_terminal() && Cancelled.is_terminal());
        assert!(!ToBill.is_terminal());
        assert!(Draft.is_editable() && !Submitted.is_editable());
        assert!(ToReceive.accepts_receipts() && !ToBill.accepts_receipts());
        assert!(ToBill.accepts_invoices() && !Submitted.accepts_invoices());
    }

    #[test]
    fn parses_and_serializes_wire_names() {
        assert_eq!("to_receive".parse::<PurchaseOrderStatus>().unwrap(), ToReceive);
        assert_eq!(serde_json::to_string(&ToBill).unwrap(), "\"TO_BILL\"");
    }
}
