use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use procura_core::{Aggregate, AggregateRoot, DomainError, Money, PurchaseOrderId, SupplierId, UserId};
use procura_events::Event;

use crate::document::{receipt_number, PaymentStatus, PurchaseInvoice, PurchaseReceipt};
use crate::item::{NewItem, PurchaseOrderItem};
use crate::ledger::LedgerTotals;
use crate::status::PurchaseOrderStatus;

/// Business key of a purchase order (`PO-<year>-<seq>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoNumber(String);

impl PoNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PoNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of the supplier taken when the order is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRef {
    pub id: SupplierId,
    pub name: String,
}

/// Aggregate root: PurchaseOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    id: PurchaseOrderId,
    po_number: PoNumber,
    supplier: Option<SupplierRef>,
    created_by: Option<UserId>,
    approved_by: Option<UserId>,
    approved_at: Option<DateTime<Utc>>,
    status: PurchaseOrderStatus,
    order_date: Option<NaiveDate>,
    expected_delivery_date: Option<NaiveDate>,
    remarks: Option<String>,
    grand_total: Money,
    total_received: Money,
    total_billed: Money,
    items: Vec<PurchaseOrderItem>,
    receipts: Vec<PurchaseReceipt>,
    invoices: Vec<PurchaseInvoice>,
    version: u64,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    created: bool,
}

impl PurchaseOrder {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: PurchaseOrderId) -> Self {
        Self {
            id,
            po_number: PoNumber::new(""),
            supplier: None,
            created_by: None,
            approved_by: None,
            approved_at: None,
            status: PurchaseOrderStatus::Draft,
            order_date: None,
            expected_delivery_date: None,
            remarks: None,
            grand_total: Money::zero(),
            total_received: Money::zero(),
            total_billed: Money::zero(),
            items: Vec::new(),
            receipts: Vec::new(),
            invoices: Vec::new(),
            version: 0,
            created: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Used by stores to stamp the persisted version on a snapshot.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn id_typed(&self) -> PurchaseOrderId {
        self.id
    }

    pub fn po_number(&self) -> &PoNumber {
        &self.po_number
    }

    pub fn supplier(&self) -> Option<&SupplierRef> {
        self.supplier.as_ref()
    }

    pub fn created_by(&self) -> Option<UserId> {
        self.created_by
    }

    pub fn approved_by(&self) -> Option<UserId> {
        self.approved_by
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    pub fn status(&self) -> PurchaseOrderStatus {
        self.status
    }

    pub fn order_date(&self) -> Option<NaiveDate> {
        self.order_date
    }

    pub fn expected_delivery_date(&self) -> Option<NaiveDate> {
        self.expected_delivery_date
    }

    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    pub fn grand_total(&self) -> Money {
        self.grand_total
    }

    pub fn total_received(&self) -> Money {
        self.total_received
    }

    pub fn total_billed(&self) -> Money {
        self.total_billed
    }

    pub fn totals(&self) -> LedgerTotals {
        LedgerTotals {
            grand_total: self.grand_total,
            total_received: self.total_received,
            total_billed: self.total_billed,
        }
    }

    pub fn items(&self) -> &[PurchaseOrderItem] {
        &self.items
    }

    pub fn receipts(&self) -> &[PurchaseReceipt] {
        &self.receipts
    }

    pub fn invoices(&self) -> &[PurchaseInvoice] {
        &self.invoices
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    fn append_remark(&mut self, remark: String) {
        self.remarks = Some(match self.remarks.take() {
            Some(existing) if !existing.is_empty() => format!("{existing} | {remark}"),
            _ => remark,
        });
    }
}

impl AggregateRoot for PurchaseOrder {
    type Id = PurchaseOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreatePurchaseOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePurchaseOrder {
    pub order_id: PurchaseOrderId,
    pub po_number: PoNumber,
    pub supplier: SupplierRef,
    pub created_by: UserId,
    /// Defaults to the date of `occurred_at`.
    pub order_date: Option<NaiveDate>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub items: Vec<NewItem>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddItem (only allowed in Draft).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub order_id: PurchaseOrderId,
    pub item: NewItem,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submit {
    pub order_id: PurchaseOrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Approve. Role checks happen before the command is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approve {
    pub order_id: PurchaseOrderId,
    pub approved_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Reject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reject {
    pub order_id: PurchaseOrderId,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReceiveGoods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveGoods {
    pub order_id: PurchaseOrderId,
    pub amount: Money,
    /// Defaults to the date of `occurred_at`.
    pub receipt_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub received_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: PostInvoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInvoice {
    pub order_id: PurchaseOrderId,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub amount: Money,
    pub notes: Option<String>,
    pub posted_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancel {
    pub order_id: PurchaseOrderId,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOrderCommand {
    CreatePurchaseOrder(CreatePurchaseOrder),
    AddItem(AddItem),
    Submit(Submit),
    Approve(Approve),
    Reject(Reject),
    ReceiveGoods(ReceiveGoods),
    PostInvoice(PostInvoice),
    Cancel(Cancel),
}

/// Event: PurchaseOrderCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderCreated {
    pub order_id: PurchaseOrderId,
    pub po_number: PoNumber,
    pub supplier: SupplierRef,
    pub created_by: UserId,
    pub order_date: NaiveDate,
    pub expected_delivery_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub items: Vec<PurchaseOrderItem>,
    pub grand_total: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PurchaseOrderItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderItemAdded {
    pub order_id: PurchaseOrderId,
    pub item: PurchaseOrderItem,
    pub grand_total: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PurchaseOrderSubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderSubmitted {
    pub order_id: PurchaseOrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PurchaseOrderApproved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderApproved {
    pub order_id: PurchaseOrderId,
    pub approved_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PurchaseOrderRejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderRejected {
    pub order_id: PurchaseOrderId,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: GoodsReceived.
///
/// Carries the new running total and the status it leads to, so applying the
/// event never re-runs ledger checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsReceived {
    pub order_id: PurchaseOrderId,
    pub receipt: PurchaseReceipt,
    pub total_received: Money,
    pub status: PurchaseOrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InvoicePosted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePosted {
    pub order_id: PurchaseOrderId,
    pub invoice: PurchaseInvoice,
    pub total_billed: Money,
    pub status: PurchaseOrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PurchaseOrderCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderCancelled {
    pub order_id: PurchaseOrderId,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOrderEvent {
    PurchaseOrderCreated(PurchaseOrderCreated),
    PurchaseOrderItemAdded(PurchaseOrderItemAdded),
    PurchaseOrderSubmitted(PurchaseOrderSubmitted),
    PurchaseOrderApproved(PurchaseOrderApproved),
    PurchaseOrderRejected(PurchaseOrderRejected),
    GoodsReceived(GoodsReceived),
    InvoicePosted(InvoicePosted),
    PurchaseOrderCancelled(PurchaseOrderCancelled),
}

impl Event for PurchaseOrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PurchaseOrderEvent::PurchaseOrderCreated(_) => "purchasing.order.created",
            PurchaseOrderEvent::PurchaseOrderItemAdded(_) => "purchasing.order.item_added",
            PurchaseOrderEvent::PurchaseOrderSubmitted(_) => "purchasing.order.submitted",
            PurchaseOrderEvent::PurchaseOrderApproved(_) => "purchasing.order.approved",
            PurchaseOrderEvent::PurchaseOrderRejected(_) => "purchasing.order.rejected",
            PurchaseOrderEvent::GoodsReceived(_) => "purchasing.order.goods_received",
            PurchaseOrderEvent::InvoicePosted(_) => "purchasing.order.invoice_posted",
            PurchaseOrderEvent::PurchaseOrderCancelled(_) => "purchasing.order.cancelled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PurchaseOrderEvent::PurchaseOrderCreated(e) => e.occurred_at,
            PurchaseOrderEvent::PurchaseOrderItemAdded(e) => e.occurred_at,
            PurchaseOrderEvent::PurchaseOrderSubmitted(e) => e.occurred_at,
            PurchaseOrderEvent::PurchaseOrderApproved(e) => e.occurred_at,
            PurchaseOrderEvent::PurchaseOrderRejected(e) => e.occurred_at,
            PurchaseOrderEvent::GoodsReceived(e) => e.occurred_at,
            PurchaseOrderEvent::InvoicePosted(e) => e.occurred_at,
            PurchaseOrderEvent::PurchaseOrderCancelled(e) => e.occurred_at,
        }
    }
}

impl Aggregate for PurchaseOrder {
    type Command = PurchaseOrderCommand;
    type Event = PurchaseOrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            PurchaseOrderEvent::PurchaseOrderCreated(e) => {
                self.id = e.order_id;
                self.po_number = e.po_number.clone();
                self.supplier = Some(e.supplier.clone());
                self.created_by = Some(e.created_by);
                self.status = PurchaseOrderStatus::Draft;
                self.order_date = Some(e.order_date);
                self.expected_delivery_date = e.expected_delivery_date;
                self.remarks = e.remarks.clone();
                self.items = e.items.clone();
                self.grand_total = e.grand_total;
                self.total_received = Money::zero();
                self.total_billed = Money::zero();
                self.created_at = Some(e.occurred_at);
                self.created = true;
            }
            PurchaseOrderEvent::PurchaseOrderItemAdded(e) => {
                self.items.push(e.item.clone());
                self.grand_total = e.grand_total;
            }
            PurchaseOrderEvent::PurchaseOrderSubmitted(_) => {
                self.status = PurchaseOrderStatus::Submitted;
            }
            PurchaseOrderEvent::PurchaseOrderApproved(e) => {
                self.status = PurchaseOrderStatus::Approved;
                self.approved_by = Some(e.approved_by);
                self.approved_at = Some(e.occurred_at);
            }
            PurchaseOrderEvent::PurchaseOrderRejected(e) => {
                self.status = PurchaseOrderStatus::Draft;
                self.append_remark(format!("REJECTED: {}", e.reason));
            }
            PurchaseOrderEvent::GoodsReceived(e) => {
                self.receipts.push(e.receipt.clone());
                self.total_received = e.total_received;
                self.status = e.status;
            }
            PurchaseOrderEvent::InvoicePosted(e) => {
                self.invoices.push(e.invoice.clone());
                self.total_billed = e.total_billed;
                self.status = e.status;
            }
            PurchaseOrderEvent::PurchaseOrderCancelled(e) => {
                self.status = PurchaseOrderStatus::Cancelled;
                self.append_remark(format!("CANCELLED: {}", e.reason));
            }
        }

        self.updated_at = Some(event.occurred_at());
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            PurchaseOrderCommand::CreatePurchaseOrder(cmd) => self.handle_create(cmd),
            PurchaseOrderCommand::AddItem(cmd) => self.handle_add_item(cmd),
            PurchaseOrderCommand::Submit(cmd) => self.handle_submit(cmd),
            PurchaseOrderCommand::Approve(cmd) => self.handle_approve(cmd),
            PurchaseOrderCommand::Reject(cmd) => self.handle_reject(cmd),
            PurchaseOrderCommand::ReceiveGoods(cmd) => self.handle_receive(cmd),
            PurchaseOrderCommand::PostInvoice(cmd) => self.handle_post_invoice(cmd),
            PurchaseOrderCommand::Cancel(cmd) => self.handle_cancel(cmd),
        }
    }
}

impl PurchaseOrder {
    /// Numbered lines and their grand total for a new order.
    ///
    /// Fails with a business rule violation on no items or a non-positive total.
    pub fn price_lines(
        new_items: &[NewItem],
    ) -> Result<(Vec<PurchaseOrderItem>, Money), DomainError> {
        if new_items.is_empty() {
            return Err(DomainError::business_rule(
                "purchase order must have at least one item",
            ));
        }

        let mut items = Vec::with_capacity(new_items.len());
        let mut grand_total = Money::zero();
        for (idx, new_item) in new_items.iter().enumerate() {
            let item = PurchaseOrderItem::from_new(idx as u32 + 1, new_item.clone())?;
            grand_total = grand_total
                .checked_add(item.line_total())
                .ok_or_else(|| DomainError::business_rule("grand total overflows"))?;
            items.push(item);
        }

        if !grand_total.is_positive() {
            return Err(DomainError::business_rule(
                "grand total must be greater than zero",
            ));
        }
        Ok((items, grand_total))
    }

    fn ensure_existing(&self, order_id: PurchaseOrderId) -> Result<(), DomainError> {
        if !self.created || self.id != order_id {
            return Err(DomainError::not_found(format!("purchase order {order_id}")));
        }
        Ok(())
    }

    fn ensure_status(
        &self,
        expected: PurchaseOrderStatus,
        target: PurchaseOrderStatus,
    ) -> Result<(), DomainError> {
        if self.status != expected {
            return Err(DomainError::invalid_transition(format!(
                "cannot move purchase order {} from {} to {target} (must be {expected})",
                self.po_number, self.status
            )));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreatePurchaseOrder) -> Result<Vec<PurchaseOrderEvent>, DomainError> {
        if self.created {
            return Err(DomainError::duplicate(format!(
                "purchase order {} already exists",
                cmd.order_id
            )));
        }
        let (items, grand_total) = Self::price_lines(&cmd.items)?;

        Ok(vec![PurchaseOrderEvent::PurchaseOrderCreated(PurchaseOrderCreated {
            order_id: cmd.order_id,
            po_number: cmd.po_number.clone(),
            supplier: cmd.supplier.clone(),
            created_by: cmd.created_by,
            order_date: cmd.order_date.unwrap_or_else(|| cmd.occurred_at.date_naive()),
            expected_delivery_date: cmd.expected_delivery_date,
            remarks: cmd.remarks.clone().filter(|r| !r.trim().is_empty()),
            items,
            grand_total,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_item(&self, cmd: &AddItem) -> Result<Vec<PurchaseOrderEvent>, DomainError> {
        self.ensure_existing(cmd.order_id)?;

        if !self.status.is_editable() {
            return Err(DomainError::invalid_transition(format!(
                "items of purchase order {} cannot change in status {}",
                self.po_number, self.status
            )));
        }

        let next_line_no = self.items.len() as u32 + 1;
        let item = PurchaseOrderItem::from_new(next_line_no, cmd.item.clone())?;
        let grand_total = self
            .grand_total
            .checked_add(item.line_total())
            .ok_or_else(|| DomainError::business_rule("grand total overflows"))?;

        Ok(vec![PurchaseOrderEvent::PurchaseOrderItemAdded(PurchaseOrderItemAdded {
            order_id: cmd.order_id,
            item,
            grand_total,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_submit(&self, cmd: &Submit) -> Result<Vec<PurchaseOrderEvent>, DomainError> {
        self.ensure_existing(cmd.order_id)?;
        self.ensure_status(PurchaseOrderStatus::Draft, PurchaseOrderStatus::Submitted)?;

        Ok(vec![PurchaseOrderEvent::PurchaseOrderSubmitted(PurchaseOrderSubmitted {
            order_id: cmd.order_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_approve(&self, cmd: &Approve) -> Result<Vec<PurchaseOrderEvent>, DomainError> {
        self.ensure_existing(cmd.order_id)?;
        self.ensure_status(PurchaseOrderStatus::Submitted, PurchaseOrderStatus::Approved)?;

        Ok(vec![PurchaseOrderEvent::PurchaseOrderApproved(PurchaseOrderApproved {
            order_id: cmd.order_id,
            approved_by: cmd.approved_by,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reject(&self, cmd: &Reject) -> Result<Vec<PurchaseOrderEvent>, DomainError> {
        self.ensure_existing(cmd.order_id)?;
        self.ensure_status(PurchaseOrderStatus::Submitted, PurchaseOrderStatus::Draft)?;

        Ok(vec![PurchaseOrderEvent::PurchaseOrderRejected(PurchaseOrderRejected {
            order_id: cmd.order_id,
            reason: cmd.reason.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_receive(&self, cmd: &ReceiveGoods) -> Result<Vec<PurchaseOrderEvent>, DomainError> {
        self.ensure_existing(cmd.order_id)?;

        if !self.status.accepts_receipts() {
            return Err(DomainError::invalid_transition(format!(
                "goods can only be received for APPROVED or TO_RECEIVE orders (current: {})",
                self.status
            )));
        }

        let totals = self.totals();
        let total_received = totals.apply_receipt(cmd.amount)?;
        let after = LedgerTotals {
            total_received,
            ..totals
        };
        let status =
            PurchaseOrderStatus::after_receipt(after.is_fully_received(), after.is_fully_billed());

        let receipt = PurchaseReceipt {
            receipt_number: receipt_number(self.po_number.as_str(), self.receipts.len() + 1),
            receipt_date: cmd.receipt_date.unwrap_or_else(|| cmd.occurred_at.date_naive()),
            received_amount: cmd.amount,
            received_by: cmd.received_by,
            notes: cmd.notes.clone(),
            created_at: cmd.occurred_at,
        };

        Ok(vec![PurchaseOrderEvent::GoodsReceived(GoodsReceived {
            order_id: cmd.order_id,
            receipt,
            total_received,
            status,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_post_invoice(&self, cmd: &PostInvoice) -> Result<Vec<PurchaseOrderEvent>, DomainError> {
        self.ensure_existing(cmd.order_id)?;

        if !self.status.accepts_invoices() {
            return Err(DomainError::invalid_transition(format!(
                "invoices can only be posted for APPROVED, TO_RECEIVE or TO_BILL orders (current: {})",
                self.status
            )));
        }

        let invoice_number = cmd.invoice_number.trim();
        if invoice_number.is_empty() {
            return Err(DomainError::business_rule("invoice number is required"));
        }
        if self.invoices.iter().any(|inv| inv.invoice_number == invoice_number) {
            return Err(DomainError::duplicate(format!(
                "invoice number already exists: {invoice_number}"
            )));
        }

        let totals = self.totals();
        let total_billed = totals.apply_invoice(cmd.amount)?;
        let after = LedgerTotals {
            total_billed,
            ..totals
        };
        let status = self
            .status
            .after_invoice(after.is_fully_received(), after.is_fully_billed());

        let invoice = PurchaseInvoice {
            invoice_number: invoice_number.to_string(),
            invoice_date: cmd.invoice_date,
            due_date: cmd.due_date,
            invoice_amount: cmd.amount,
            payment_status: PaymentStatus::Unpaid,
            posted_by: cmd.posted_by,
            notes: cmd.notes.clone(),
            created_at: cmd.occurred_at,
        };

        Ok(vec![PurchaseOrderEvent::InvoicePosted(InvoicePosted {
            order_id: cmd.order_id,
            invoice,
            total_billed,
            status,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_cancel(&self, cmd: &Cancel) -> Result<Vec<PurchaseOrderEvent>, DomainError> {
        self.ensure_existing(cmd.order_id)?;

        if self.status.is_terminal() {
            return Err(DomainError::invalid_transition(format!(
                "cannot cancel a {} purchase order",
                self.status
            )));
        }
        if self.total_received.is_positive() {
            return Err(DomainError::business_rule(
                "cannot cancel a purchase order with goods already received",
            ));
        }

        Ok(vec![PurchaseOrderEvent::PurchaseOrderCancelled(PurchaseOrderCancelled {
            order_id: cmd.order_id,
            reason: cmd.reason.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}
