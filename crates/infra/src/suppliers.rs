//! Supplier lookup used when creating orders.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use procura_core::{DomainError, DomainResult, SupplierId};
use procura_purchasing::SupplierRef;

pub trait SupplierDirectory: Send + Sync {
    /// Resolve a supplier, failing with `NotFound` when it does not exist.
    fn lookup(&self, id: SupplierId) -> DomainResult<SupplierRef>;
}

impl<D> SupplierDirectory for Arc<D>
where
    D: SupplierDirectory + ?Sized,
{
    fn lookup(&self, id: SupplierId) -> DomainResult<SupplierRef> {
        (**self).lookup(id)
    }
}

/// In-memory supplier directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySupplierDirectory {
    suppliers: RwLock<HashMap<SupplierId, SupplierRef>>,
}

impl InMemorySupplierDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str) -> SupplierRef {
        let supplier = SupplierRef {
            id: SupplierId::new(),
            name: name.to_string(),
        };
        if let Ok(mut map) = self.suppliers.write() {
            map.insert(supplier.id, supplier.clone());
        }
        supplier
    }
}

impl SupplierDirectory for InMemorySupplierDirectory {
    fn lookup(&self, id: SupplierId) -> DomainResult<SupplierRef> {
        self.suppliers
            .read()
            .ok()
            .and_then(|map| map.get(&id).cloned())
            .ok_or_else(|| DomainError::not_found(format!("supplier not found: {id}")))
    }
}
