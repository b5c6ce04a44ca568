use serde::{Deserialize, Serialize};
use thiserror::Error;

use procura_core::{DomainError, UserId};

use crate::{Permission, Role};

/// An already-authenticated actor, as resolved by the identity provider.
///
/// The workflow trusts this value; credential checks happen upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        full_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            full_name: full_name.into(),
            role,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: role '{role}' lacks permission '{permission}'")]
    Forbidden { role: Role, permission: String },
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        DomainError::access_denied(value.to_string())
    }
}

/// Authorize an actor for a permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(actor: &Actor, required: &Permission) -> Result<(), AuthzError> {
    if actor.role.grants(required) {
        Ok(())
    } else {
        tracing::debug!(
            user = %actor.username,
            role = %actor.role,
            permission = %required,
            "authorization denied"
        );
        Err(AuthzError::Forbidden {
            role: actor.role,
            permission: required.as_str().to_string(),
        })
    }
}
