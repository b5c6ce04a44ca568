use serde::{Deserialize, Serialize};
use thiserror::Error;

use procura_core::PurchaseOrderId;
use procura_purchasing::{PurchaseOrder, PurchaseOrderStatus};
use std::sync::Arc;

/// Page request for list queries (0-based page index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 20 }
    }
}

impl PageRequest {
    pub const MAX_SIZE: u32 = 1000;

    pub fn new(page: Option<u32>, size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(0),
            size: size.unwrap_or(20).clamp(1, Self::MAX_SIZE),
        }
    }

    pub fn offset(&self) -> usize {
        self.page as usize * self.size as usize
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of matches across all pages.
    pub total: u64,
    pub request: PageRequest,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Cut one page out of an already sorted result set.
    pub fn from_sorted(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let offset = request.offset();
        let items: Vec<T> = all
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .collect();
        let has_more = (offset + items.len()) < total as usize;
        Self {
            items,
            total,
            request,
            has_more,
        }
    }
}

/// Order store operation error.
///
/// These are storage-level failures. Domain rule violations never originate
/// here, with the exception of uniqueness (PO number, invoice number) which
/// only the store can enforce across orders.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderStoreError {
    #[error("purchase order not found: {0}")]
    NotFound(String),

    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("duplicate resource: {0}")]
    Duplicate(String),

    #[error("order store backend failure: {0}")]
    Backend(String),
}

/// Snapshot store for purchase orders.
///
/// `save` is the only write. It succeeds only when the snapshot's version
/// equals the stored version (or the order is new and version is `0`), and it
/// returns the stored snapshot carrying `version + 1`.
pub trait OrderStore: Send + Sync {
    fn load_by_id(&self, id: PurchaseOrderId) -> Result<Option<PurchaseOrder>, OrderStoreError>;

    fn load_by_number(&self, po_number: &str) -> Result<Option<PurchaseOrder>, OrderStoreError>;

    fn exists_by_number(&self, po_number: &str) -> Result<bool, OrderStoreError>;

    /// Whether any order already carries an invoice with this number.
    fn invoice_number_exists(&self, invoice_number: &str) -> Result<bool, OrderStoreError>;

    fn save(&self, order: &PurchaseOrder) -> Result<PurchaseOrder, OrderStoreError>;

    /// All orders, newest first.
    fn list(&self, page: PageRequest) -> Result<Page<PurchaseOrder>, OrderStoreError>;

    /// Orders in one status, newest first.
    fn find_by_status(
        &self,
        status: PurchaseOrderStatus,
        page: PageRequest,
    ) -> Result<Page<PurchaseOrder>, OrderStoreError>;

    /// Case-insensitive match on PO number or supplier name, newest first.
    fn search(&self, query: &str, page: PageRequest) -> Result<Page<PurchaseOrder>, OrderStoreError>;

    /// Approved orders still waiting on goods or bills, earliest expected
    /// delivery first (orders without a date last).
    fn active_pending(&self) -> Result<Vec<PurchaseOrder>, OrderStoreError>;

    fn all(&self) -> Result<Vec<PurchaseOrder>, OrderStoreError>;
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn load_by_id(&self, id: PurchaseOrderId) -> Result<Option<PurchaseOrder>, OrderStoreError> {
        (**self).load_by_id(id)
    }

    fn load_by_number(&self, po_number: &str) -> Result<Option<PurchaseOrder>, OrderStoreError> {
        (**self).load_by_number(po_number)
    }

    fn exists_by_number(&self, po_number: &str) -> Result<bool, OrderStoreError> {
        (**self).exists_by_number(po_number)
    }

    fn invoice_number_exists(&self, invoice_number: &str) -> Result<bool, OrderStoreError> {
        (**self).invoice_number_exists(invoice_number)
    }

    fn save(&self, order: &PurchaseOrder) -> Result<PurchaseOrder, OrderStoreError> {
        (**self).save(order)
    }

    fn list(&self, page: PageRequest) -> Result<Page<PurchaseOrder>, OrderStoreError> {
        (**self).list(page)
    }

    fn find_by_status(
        &self,
        status: PurchaseOrderStatus,
        page: PageRequest,
    ) -> Result<Page<PurchaseOrder>, OrderStoreError> {
        (**self).find_by_status(status, page)
    }

    fn search(&self, query: &str, page: PageRequest) -> Result<Page<PurchaseOrder>, OrderStoreError> {
        (**self).search(query, page)
    }

    fn active_pending(&self) -> Result<Vec<PurchaseOrder>, OrderStoreError> {
        (**self).active_pending()
    }

    fn all(&self) -> Result<Vec<PurchaseOrder>, OrderStoreError> {
        (**self).all()
    }
}
