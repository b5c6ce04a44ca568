//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every workflow failure is raised at the point of detection, before anything
/// is written. The variants are the kinds a caller layer maps to distinct
/// response categories; storage plumbing failures belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced purchase order, supplier or user does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The requested operation is not allowed from the current status.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A monetary or lifecycle business rule was violated.
    #[error("business rule violated: {0}")]
    BusinessRuleViolation(String),

    /// The acting role lacks permission for the operation.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The snapshot being saved is stale; reload and retry the whole operation.
    #[error("concurrent modification: {0}")]
    ConcurrentModification(String),

    /// A unique identifier (PO number, invoice number) is already taken.
    #[error("duplicate resource: {0}")]
    DuplicateResource(String),
}

/// Discriminant of [`DomainError`], useful for mapping without matching messages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidTransition,
    BusinessRuleViolation,
    AccessDenied,
    ConcurrentModification,
    DuplicateResource,
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRuleViolation(msg.into())
    }

    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }

    pub fn concurrent_modification(msg: impl Into<String>) -> Self {
        Self::ConcurrentModification(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::DuplicateResource(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::InvalidTransition(_) => ErrorKind::InvalidTransition,
            DomainError::BusinessRuleViolation(_) => ErrorKind::BusinessRuleViolation,
            DomainError::AccessDenied(_) => ErrorKind::AccessDenied,
            DomainError::ConcurrentModification(_) => ErrorKind::ConcurrentModification,
            DomainError::DuplicateResource(_) => ErrorKind::DuplicateResource,
        }
    }

    /// Only a stale-version failure is worth retrying, and only by re-running
    /// the whole operation against a fresh snapshot.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::ConcurrentModification(_))
    }

    pub fn message(&self) -> &str {
        match self {
            DomainError::NotFound(m)
            | DomainError::InvalidTransition(m)
            | DomainError::BusinessRuleViolation(m)
            | DomainError::AccessDenied(m)
            | DomainError::ConcurrentModification(m)
            | DomainError::DuplicateResource(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_concurrent_modification_is_retryable() {
        assert!(DomainError::concurrent_modification("stale").is_retryable());
        assert!(!DomainError::business_rule("over-receipt").is_retryable());
        assert!(!DomainError::duplicate("INV-1").is_retryable());
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(DomainError::not_found("po").kind(), ErrorKind::NotFound);
        assert_eq!(
            DomainError::invalid_transition("x").kind(),
            ErrorKind::InvalidTransition
        );
        assert_eq!(DomainError::access_denied("x").kind(), ErrorKind::AccessDenied);
    }

    #[test]
    fn display_includes_message() {
        let err = DomainError::business_rule("amount must be positive");
        assert_eq!(err.to_string(), "business rule violated: amount must be positive");
        assert_eq!(err.message(), "amount must be positive");
    }
}
