//! Driving ports for account use-cases.
//!
//! Inbound adapters call these to register, authenticate and administer
//! users without importing persistence or hashing concerns.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, Role, User, UserId};

/// Account mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a new account with the default role.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Change `target`'s role; `actor` must be an administrator.
    async fn change_role(&self, actor: &UserId, target: &UserId, role: Role)
    -> Result<User, Error>;
}

/// Account reads and credential checks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;

    /// Resolve the session user.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;

    /// List every account; `actor` must be an administrator.
    async fn list_users(&self, actor: &UserId) -> Result<Vec<User>, Error>;
}
