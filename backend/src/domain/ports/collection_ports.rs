//! Driving ports for personal collection use-cases.

use async_trait::async_trait;

use crate::domain::{AddOutcome, Error, Miniature, MiniatureId, RemoveOutcome, UserId};

/// Collection mutations. Unknown miniatures surface as `NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionCommand: Send + Sync {
    /// Add a miniature to the user's collection.
    async fn add(&self, user_id: &UserId, miniature_id: MiniatureId) -> Result<AddOutcome, Error>;

    /// Remove a miniature from the user's collection.
    async fn remove(
        &self,
        user_id: &UserId,
        miniature_id: MiniatureId,
    ) -> Result<RemoveOutcome, Error>;
}

/// Collection reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionQuery: Send + Sync {
    /// The user's collection in the configured order.
    async fn list(&self, user_id: &UserId) -> Result<Vec<Miniature>, Error>;

    /// Whether the miniature is in the user's collection.
    async fn contains(&self, user_id: &UserId, miniature_id: MiniatureId) -> Result<bool, Error>;
}
