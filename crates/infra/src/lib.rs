//! Infrastructure layer: order storage, number allocation, audit delivery,
//! configuration and the workflow engine that composes them.

pub mod audit;
pub mod config;
pub mod order_store;
pub mod sequence;
pub mod suppliers;
pub mod workflow;

pub use config::ProcurementConfig;
pub use workflow::{
    CreateOrderRequest, PostInvoiceRequest, ReceiveGoodsRequest, WorkflowEngine, WorkflowError,
};

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod test_support;
