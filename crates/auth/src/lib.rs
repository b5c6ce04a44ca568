//! `procura-auth`: role policy for the purchase order workflow.
//!
//! This crate is intentionally decoupled from HTTP, credentials and storage:
//! it receives already-authenticated actors and answers policy questions.

pub mod authorize;
pub mod identity;
pub mod permissions;
pub mod roles;

pub use authorize::{Actor, AuthzError, authorize};
pub use identity::{IdentityProvider, InMemoryIdentityProvider};
pub use permissions::Permission;
pub use roles::Role;
