//! `procura-core`: domain foundation building blocks for purchasing.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod error;
pub mod id;
pub mod money;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion, execute};
pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::{PurchaseOrderId, SupplierId, UserId};
pub use money::{Money, Quantity, UnitPrice};
