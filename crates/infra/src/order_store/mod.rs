//! Purchase order persistence boundary.
//!
//! A store keeps whole [`PurchaseOrder`](procura_purchasing::PurchaseOrder)
//! snapshots (items, receipts and invoices included) and guards every save with
//! an optimistic version check.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryOrderStore;
pub use r#trait::{OrderStore, OrderStoreError, Page, PageRequest};
