//! Purchase order workflow engine (application-level orchestration).
//!
//! Every state-changing operation runs the same pipeline:
//!
//! ```text
//! request
//!   -> authorize (approve / reject only)
//!   -> load snapshot from the order store
//!   -> handle command on the aggregate (state + ledger checks, no IO)
//!   -> save snapshot (optimistic version check)
//!   -> one audit record per emitted event (fire-and-forget)
//! ```
//!
//! A failure at any step returns before the save, so nothing is partially
//! written. Nothing is retried here: a `ConcurrentModification` goes back to
//! the caller, who reloads and runs the whole operation again.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::{info, warn};

use procura_auth::{authorize, Actor, AuthzError, Permission};
use procura_core::{
    execute, AggregateRoot, DomainError, ErrorKind, Money, PurchaseOrderId, SupplierId,
};
use procura_events::{AuditAction, AuditRecord, AuditSink, Event};
use procura_purchasing::{
    AddItem, Approve, Cancel, CreatePurchaseOrder, NewItem, PostInvoice, ProcurementKpi,
    PurchaseOrder, PurchaseOrderCommand, PurchaseOrderEvent, PurchaseOrderStatus, ReceiveGoods,
    Reject, Submit,
};

use crate::order_store::{OrderStore, OrderStoreError, Page, PageRequest};
use crate::sequence::PoNumberAllocator;
use crate::suppliers::SupplierDirectory;

pub const ENTITY_TYPE: &str = "PurchaseOrder";

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    #[error("business rule violation: {0}")]
    BusinessRuleViolation(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    /// Stale snapshot; reload and retry the whole operation.
    #[error("concurrent modification: {0}")]
    ConcurrentModification(String),
    #[error("duplicate resource: {0}")]
    DuplicateResource(String),
    /// Backend failure in the order store.
    #[error(transparent)]
    Store(OrderStoreError),
}

impl WorkflowError {
    /// `None` for backend failures, which are not domain outcomes.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            WorkflowError::NotFound(_) => Some(ErrorKind::NotFound),
            WorkflowError::InvalidTransition(_) => Some(ErrorKind::InvalidTransition),
            WorkflowError::BusinessRuleViolation(_) => Some(ErrorKind::BusinessRuleViolation),
            WorkflowError::AccessDenied(_) => Some(ErrorKind::AccessDenied),
            WorkflowError::ConcurrentModification(_) => Some(ErrorKind::ConcurrentModification),
            WorkflowError::DuplicateResource(_) => Some(ErrorKind::DuplicateResource),
            WorkflowError::Store(_) => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkflowError::ConcurrentModification(_))
    }
}

impl From<DomainError> for WorkflowError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound(msg) => WorkflowError::NotFound(msg),
            DomainError::InvalidTransition(msg) => WorkflowError::InvalidTransition(msg),
            DomainError::BusinessRuleViolation(msg) => WorkflowError::BusinessRuleViolation(msg),
            DomainError::AccessDenied(msg) => WorkflowError::AccessDenied(msg),
            DomainError::ConcurrentModification(msg) => WorkflowError::ConcurrentModification(msg),
            DomainError::DuplicateResource(msg) => WorkflowError::DuplicateResource(msg),
        }
    }
}

impl From<OrderStoreError> for WorkflowError {
    fn from(value: OrderStoreError) -> Self {
        match value {
            OrderStoreError::NotFound(msg) => WorkflowError::NotFound(msg),
            OrderStoreError::Concurrency(msg) => WorkflowError::ConcurrentModification(msg),
            OrderStoreError::Duplicate(msg) => WorkflowError::DuplicateResource(msg),
            other @ OrderStoreError::Backend(_) => WorkflowError::Store(other),
        }
    }
}

impl From<AuthzError> for WorkflowError {
    fn from(value: AuthzError) -> Self {
        WorkflowError::from(DomainError::from(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderRequest {
    pub supplier_id: SupplierId,
    pub order_date: Option<NaiveDate>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub items: Vec<NewItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveGoodsRequest {
    pub amount: Money,
    pub receipt_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInvoiceRequest {
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub amount: Money,
    pub notes: Option<String>,
}

/// Workflow engine over injected collaborators.
///
/// - `S`: order store
/// - `A`: audit sink
/// - `D`: supplier directory
/// - `N`: PO number allocator
#[derive(Debug)]
pub struct WorkflowEngine<S, A, D, N> {
    store: S,
    audit: A,
    suppliers: D,
    allocator: N,
}

impl<S, A, D, N> WorkflowEngine<S, A, D, N> {
    pub fn new(store: S, audit: A, suppliers: D, allocator: N) -> Self {
        Self {
            store,
            audit,
            suppliers,
            allocator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S, A, D, N> WorkflowEngine<S, A, D, N>
where
    S: OrderStore,
    A: AuditSink,
    D: SupplierDirectory,
    N: PoNumberAllocator,
{
    /// Create a DRAFT order with a freshly allocated PO number.
    pub fn create(&self, actor: &Actor, request: CreateOrderRequest) -> Result<PurchaseOrder, WorkflowError> {
        let now = Utc::now();
        let supplier = self.suppliers.lookup(request.supplier_id)?;
        // Rejected orders must not consume a number.
        PurchaseOrder::price_lines(&request.items)?;
        let po_number = self.allocator.next(now)?;

        let order_id = PurchaseOrderId::new();
        let mut po = PurchaseOrder::empty(order_id);
        let command = PurchaseOrderCommand::CreatePurchaseOrder(CreatePurchaseOrder {
            order_id,
            po_number,
            supplier,
            created_by: actor.id,
            order_date: request.order_date,
            expected_delivery_date: request.expected_delivery_date,
            remarks: request.remarks,
            items: request.items,
            occurred_at: now,
        });
        let events = execute(&mut po, &command)?;
        let saved = self.save(&po)?;

        self.record_audit(actor, &saved, None, &events);
        info!(
            po_number = %saved.po_number(),
            grand_total = %saved.grand_total(),
            actor = %actor.username,
            "purchase order created"
        );
        Ok(saved)
    }

    /// Append a line to a DRAFT order.
    pub fn add_item(
        &self,
        actor: &Actor,
        order_id: PurchaseOrderId,
        item: NewItem,
    ) -> Result<PurchaseOrder, WorkflowError> {
        self.run(actor, order_id, |occurred_at| {
            PurchaseOrderCommand::AddItem(AddItem {
                order_id,
                item,
                occurred_at,
            })
        })
    }

    pub fn submit(&self, actor: &Actor, order_id: PurchaseOrderId) -> Result<PurchaseOrder, WorkflowError> {
        self.run(actor, order_id, |occurred_at| {
            PurchaseOrderCommand::Submit(Submit {
                order_id,
                occurred_at,
            })
        })
    }

    /// Approve a SUBMITTED order. Requires a manager or admin.
    pub fn approve(&self, actor: &Actor, order_id: PurchaseOrderId) -> Result<PurchaseOrder, WorkflowError> {
        authorize(actor, &Permission::ORDERS_APPROVE)?;
        self.run(actor, order_id, |occurred_at| {
            PurchaseOrderCommand::Approve(Approve {
                order_id,
                approved_by: actor.id,
                occurred_at,
            })
        })
    }

    /// Send a SUBMITTED order back to DRAFT. Requires a manager or admin.
    pub fn reject(
        &self,
        actor: &Actor,
        order_id: PurchaseOrderId,
        reason: &str,
    ) -> Result<PurchaseOrder, WorkflowError> {
        authorize(actor, &Permission::ORDERS_REJECT)?;
        self.run(actor, order_id, |occurred_at| {
            PurchaseOrderCommand::Reject(Reject {
                order_id,
                reason: reason.to_string(),
                occurred_at,
            })
        })
    }

    pub fn receive_goods(
        &self,
        actor: &Actor,
        order_id: PurchaseOrderId,
        request: ReceiveGoodsRequest,
    ) -> Result<PurchaseOrder, WorkflowError> {
        self.run(actor, order_id, |occurred_at| {
            PurchaseOrderCommand::ReceiveGoods(ReceiveGoods {
                order_id,
                amount: request.amount,
                receipt_date: request.receipt_date,
                notes: request.notes,
                received_by: actor.id,
                occurred_at,
            })
        })
    }

    /// Post a supplier invoice. Invoice numbers are unique across all orders.
    pub fn post_invoice(
        &self,
        actor: &Actor,
        order_id: PurchaseOrderId,
        request: PostInvoiceRequest,
    ) -> Result<PurchaseOrder, WorkflowError> {
        let po = self.load(order_id)?;
        let invoice_number = request.invoice_number.trim().to_string();
        if po.status().accepts_invoices() && self.store.invoice_number_exists(&invoice_number)? {
            return Err(WorkflowError::DuplicateResource(format!(
                "invoice number already exists: {invoice_number}"
            )));
        }

        self.apply(actor, po, |occurred_at| {
            PurchaseOrderCommand::PostInvoice(PostInvoice {
                order_id,
                invoice_number,
                invoice_date: request.invoice_date,
                due_date: request.due_date,
                amount: request.amount,
                notes: request.notes,
                posted_by: actor.id,
                occurred_at,
            })
        })
    }

    pub fn cancel(
        &self,
        actor: &Actor,
        order_id: PurchaseOrderId,
        reason: &str,
    ) -> Result<PurchaseOrder, WorkflowError> {
        self.run(actor, order_id, |occurred_at| {
            PurchaseOrderCommand::Cancel(Cancel {
                order_id,
                reason: reason.to_string(),
                occurred_at,
            })
        })
    }

    pub fn get(&self, order_id: PurchaseOrderId) -> Result<PurchaseOrder, WorkflowError> {
        self.load(order_id)
    }

    pub fn get_by_number(&self, po_number: &str) -> Result<PurchaseOrder, WorkflowError> {
        self.store
            .load_by_number(po_number)?
            .ok_or_else(|| WorkflowError::NotFound(format!("purchase order not found: {po_number}")))
    }

    pub fn list(&self, page: PageRequest) -> Result<Page<PurchaseOrder>, WorkflowError> {
        Ok(self.store.list(page)?)
    }

    pub fn list_by_status(
        &self,
        status: PurchaseOrderStatus,
        page: PageRequest,
    ) -> Result<Page<PurchaseOrder>, WorkflowError> {
        Ok(self.store.find_by_status(status, page)?)
    }

    pub fn search(&self, query: &str, page: PageRequest) -> Result<Page<PurchaseOrder>, WorkflowError> {
        Ok(self.store.search(query, page)?)
    }

    pub fn active_pending(&self) -> Result<Vec<PurchaseOrder>, WorkflowError> {
        Ok(self.store.active_pending()?)
    }

    pub fn kpi(&self) -> Result<ProcurementKpi, WorkflowError> {
        Ok(ProcurementKpi::compute(&self.store.all()?))
    }

    fn load(&self, order_id: PurchaseOrderId) -> Result<PurchaseOrder, WorkflowError> {
        self.store
            .load_by_id(order_id)?
            .ok_or_else(|| WorkflowError::NotFound(format!("purchase order not found: {order_id}")))
    }

    fn run(
        &self,
        actor: &Actor,
        order_id: PurchaseOrderId,
        make_command: impl FnOnce(DateTime<Utc>) -> PurchaseOrderCommand,
    ) -> Result<PurchaseOrder, WorkflowError> {
        let po = self.load(order_id)?;
        self.apply(actor, po, make_command)
    }

    fn apply(
        &self,
        actor: &Actor,
        mut po: PurchaseOrder,
        make_command: impl FnOnce(DateTime<Utc>) -> PurchaseOrderCommand,
    ) -> Result<PurchaseOrder, WorkflowError> {
        let previous = po.status();
        let events = execute(&mut po, &make_command(Utc::now()))?;
        if events.is_empty() {
            return Ok(po);
        }

        let saved = self.save(&po)?;
        self.record_audit(actor, &saved, Some(previous), &events);

        for event in &events {
            info!(
                po_number = %saved.po_number(),
                event = event.event_type(),
                from = %previous,
                to = %saved.status(),
                version = saved.version(),
                actor = %actor.username,
                "purchase order updated"
            );
        }
        Ok(saved)
    }

    fn save(&self, po: &PurchaseOrder) -> Result<PurchaseOrder, WorkflowError> {
        self.store.save(po).map_err(|err| {
            if let OrderStoreError::Concurrency(msg) = &err {
                warn!(po_number = %po.po_number(), version = po.version(), reason = %msg, "stale purchase order snapshot");
            }
            WorkflowError::from(err)
        })
    }

    fn record_audit(
        &self,
        actor: &Actor,
        saved: &PurchaseOrder,
        previous: Option<PurchaseOrderStatus>,
        events: &[PurchaseOrderEvent],
    ) {
        for event in events {
            self.audit.record(audit_record(actor, saved, previous, event));
        }
    }
}

/// Map one domain event to its audit trail entry.
pub fn audit_record(
    actor: &Actor,
    po: &PurchaseOrder,
    previous: Option<PurchaseOrderStatus>,
    event: &PurchaseOrderEvent,
) -> AuditRecord {
    let (action, description) = match event {
        PurchaseOrderEvent::PurchaseOrderCreated(e) => (
            AuditAction::PoCreated,
            format!(
                "PO {} created for supplier {} | Total: {}",
                e.po_number, e.supplier.name, e.grand_total
            ),
        ),
        PurchaseOrderEvent::PurchaseOrderItemAdded(e) => (
            AuditAction::PoUpdated,
            format!(
                "Line {} added: {} | Total: {}",
                e.item.line_no(),
                e.item.description(),
                e.grand_total
            ),
        ),
        PurchaseOrderEvent::PurchaseOrderSubmitted(_) => {
            (AuditAction::PoSubmitted, "PO submitted for approval".to_string())
        }
        PurchaseOrderEvent::PurchaseOrderApproved(_) => (
            AuditAction::PoApproved,
            format!("PO approved by {}", actor.full_name),
        ),
        PurchaseOrderEvent::PurchaseOrderRejected(e) => {
            (AuditAction::PoRejected, format!("Rejected: {}", e.reason))
        }
        PurchaseOrderEvent::GoodsReceived(e) => (
            AuditAction::PoReceived,
            format!(
                "Received: {} | Total: {}",
                e.receipt.received_amount, e.total_received
            ),
        ),
        PurchaseOrderEvent::InvoicePosted(e) => (
            AuditAction::PoBilled,
            format!(
                "Invoice: {} | Amount: {}",
                e.invoice.invoice_number, e.invoice.invoice_amount
            ),
        ),
        PurchaseOrderEvent::PurchaseOrderCancelled(e) => {
            (AuditAction::PoCancelled, format!("Cancelled: {}", e.reason))
        }
    };

    let record = AuditRecord::new(
        action,
        ENTITY_TYPE,
        (*po.id()).into(),
        actor.username.clone(),
        event.occurred_at(),
        description,
    )
    .with_new_status(po.status());

    match previous {
        Some(status) => record.with_previous_status(status),
        None => record,
    }
}
