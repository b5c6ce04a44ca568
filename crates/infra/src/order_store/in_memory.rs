use std::collections::HashMap;
use std::sync::RwLock;

use procura_core::{AggregateRoot, ExpectedVersion, PurchaseOrderId};
use procura_purchasing::{PurchaseOrder, PurchaseOrderStatus};

use super::r#trait::{OrderStore, OrderStoreError, Page, PageRequest};

#[derive(Debug, Default)]
struct Tables {
    orders: HashMap<PurchaseOrderId, PurchaseOrder>,
    /// PO number -> owning order.
    numbers: HashMap<String, PurchaseOrderId>,
    /// Invoice number -> owning order.
    invoices: HashMap<String, PurchaseOrderId>,
}

/// In-memory order store.
///
/// Intended for tests/dev. A single write lock covers the version check, the
/// uniqueness checks and the write, so each save is atomic.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    inner: RwLock<Tables>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, OrderStoreError> {
        let tables = self
            .inner
            .read()
            .map_err(|_| OrderStoreError::Backend("lock poisoned".to_string()))?;
        Ok(f(&tables))
    }

    fn newest_first(&self, filter: impl Fn(&PurchaseOrder) -> bool) -> Result<Vec<PurchaseOrder>, OrderStoreError> {
        let mut matches = self.read(|t| {
            t.orders
                .values()
                .filter(|po| filter(po))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        matches.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id_typed().cmp(&a.id_typed()))
        });
        Ok(matches)
    }
}

impl OrderStore for InMemoryOrderStore {
    fn load_by_id(&self, id: PurchaseOrderId) -> Result<Option<PurchaseOrder>, OrderStoreError> {
        self.read(|t| t.orders.get(&id).cloned())
    }

    fn load_by_number(&self, po_number: &str) -> Result<Option<PurchaseOrder>, OrderStoreError> {
        self.read(|t| {
            t.numbers
                .get(po_number)
                .and_then(|id| t.orders.get(id))
                .cloned()
        })
    }

    fn exists_by_number(&self, po_number: &str) -> Result<bool, OrderStoreError> {
        self.read(|t| t.numbers.contains_key(po_number))
    }

    fn invoice_number_exists(&self, invoice_number: &str) -> Result<bool, OrderStoreError> {
        self.read(|t| t.invoices.contains_key(invoice_number))
    }

    fn save(&self, order: &PurchaseOrder) -> Result<PurchaseOrder, OrderStoreError> {
        let id = order.id_typed();
        let mut tables = self
            .inner
            .write()
            .map_err(|_| OrderStoreError::Backend("lock poisoned".to_string()))?;

        let current = tables.orders.get(&id).map(|po| po.version());
        ExpectedVersion::of(order).check(current).map_err(|err| {
            OrderStoreError::Concurrency(format!("purchase order {id}: {}", err.message()))
        })?;

        let number = order.po_number().as_str();
        if let Some(owner) = tables.numbers.get(number) {
            if *owner != id {
                return Err(OrderStoreError::Duplicate(format!(
                    "PO number already exists: {number}"
                )));
            }
        }
        for invoice in order.invoices() {
            if let Some(owner) = tables.invoices.get(&invoice.invoice_number) {
                if *owner != id {
                    return Err(OrderStoreError::Duplicate(format!(
                        "invoice number already exists: {}",
                        invoice.invoice_number
                    )));
                }
            }
        }

        let stored = order.clone().with_version(current.unwrap_or(0) + 1);
        tables.numbers.insert(number.to_string(), id);
        for invoice in stored.invoices() {
            tables.invoices.insert(invoice.invoice_number.clone(), id);
        }
        tables.orders.insert(id, stored.clone());

        Ok(stored)
    }

    fn list(&self, page: PageRequest) -> Result<Page<PurchaseOrder>, OrderStoreError> {
        Ok(Page::from_sorted(self.newest_first(|_| true)?, page))
    }

    fn find_by_status(
        &self,
        status: PurchaseOrderStatus,
        page: PageRequest,
    ) -> Result<Page<PurchaseOrder>, OrderStoreError> {
        Ok(Page::from_sorted(
            self.newest_first(|po| po.status() == status)?,
            page,
        ))
    }

    fn search(&self, query: &str, page: PageRequest) -> Result<Page<PurchaseOrder>, OrderStoreError> {
        let needle = query.trim().to_lowercase();
        let matches = self.newest_first(|po| {
            needle.is_empty()
                || po.po_number().as_str().to_lowercase().contains(&needle)
                || po
                    .supplier()
                    .is_some_and(|s| s.name.to_lowercase().contains(&needle))
        })?;
        Ok(Page::from_sorted(matches, page))
    }

    fn active_pending(&self) -> Result<Vec<PurchaseOrder>, OrderStoreError> {
        let mut pending = self.read(|t| {
            t.orders
                .values()
                .filter(|po| po.status().is_active())
                .cloned()
                .collect::<Vec<_>>()
        })?;
        // `None` sorts before `Some`, so undated orders are keyed to go last.
        pending.sort_by_key(|po| {
            (
                po.expected_delivery_date().is_none(),
                po.expected_delivery_date(),
                po.id_typed(),
            )
        });
        Ok(pending)
    }

    fn all(&self) -> Result<Vec<PurchaseOrder>, OrderStoreError> {
        self.newest_first(|_| true)
    }
}
