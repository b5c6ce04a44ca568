//! Identity/role provider boundary.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use procura_core::{DomainError, DomainResult, UserId};

use crate::{Actor, Role};

/// Resolves an authenticated username to the actor the workflow acts for.
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, username: &str) -> DomainResult<Actor>;
}

impl<P> IdentityProvider for Arc<P>
where
    P: IdentityProvider + ?Sized,
{
    fn resolve(&self, username: &str) -> DomainResult<Actor> {
        (**self).resolve(username)
    }
}

/// In-memory user directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    users: RwLock<HashMap<String, Actor>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a user and return the resulting actor.
    pub fn register(&self, username: &str, full_name: &str, role: Role) -> Actor {
        let actor = Actor::new(UserId::new(), username, full_name, role);
        if let Ok(mut users) = self.users.write() {
            users.insert(username.to_string(), actor.clone());
        }
        actor
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    fn resolve(&self, username: &str) -> DomainResult<Actor> {
        let users = self
            .users
            .read()
            .map_err(|_| DomainError::not_found("user directory unavailable"))?;
        users
            .get(username)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("user not found: {username}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_users() {
        let directory = InMemoryIdentityProvider::new();
        let registered = directory.register("manager", "Mia Manager", Role::PurchasingManager);

        let actor = directory.resolve("manager").unwrap();
        assert_eq!(actor, registered);
        assert_eq!(actor.role, Role::PurchasingManager);
    }

    #[test]
    fn unknown_user_is_not_found() {
        let directory = InMemoryIdentityProvider::new();
        assert!(matches!(
            directory.resolve("ghost"),
            Err(DomainError::NotFound(_))
        ));
    }
}
