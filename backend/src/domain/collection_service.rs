//! Personal collection service.
//!
//! Implements the collection driving ports by resolving the miniature and
//! delegating to the [`MembershipLedger`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::catalogue_service::load_miniature;
use crate::domain::ports::{
    CollectionCommand, CollectionQuery, MembershipRepository, MiniatureRepository,
};
use crate::domain::{
    AddOutcome, Error, MembershipLedger, Miniature, MiniatureId, RemoveOutcome, UserId,
};

/// Collection service implementing [`CollectionCommand`] and
/// [`CollectionQuery`].
pub struct CollectionService<M, R: ?Sized> {
    miniatures: Arc<M>,
    ledger: MembershipLedger<R>,
}

impl<M, R: ?Sized> Clone for CollectionService<M, R> {
    fn clone(&self) -> Self {
        Self {
            miniatures: Arc::clone(&self.miniatures),
            ledger: self.ledger.clone(),
        }
    }
}

impl<M, R> CollectionService<M, R>
where
    M: MiniatureRepository,
    R: MembershipRepository + ?Sized,
{
    /// Create a collection service.
    pub fn new(miniatures: Arc<M>, ledger: MembershipLedger<R>) -> Self {
        Self { miniatures, ledger }
    }
}

#[async_trait]
impl<M, R> CollectionCommand for CollectionService<M, R>
where
    M: MiniatureRepository,
    R: MembershipRepository + ?Sized,
{
    async fn add(&self, user_id: &UserId, miniature_id: MiniatureId) -> Result<AddOutcome, Error> {
        load_miniature(self.miniatures.as_ref(), miniature_id).await?;
        self.ledger.add(user_id, miniature_id).await
    }

    async fn remove(
        &self,
        user_id: &UserId,
        miniature_id: MiniatureId,
    ) -> Result<RemoveOutcome, Error> {
        load_miniature(self.miniatures.as_ref(), miniature_id).await?;
        self.ledger.remove(user_id, miniature_id).await
    }
}

#[async_trait]
impl<M, R> CollectionQuery for CollectionService<M, R>
where
    M: MiniatureRepository,
    R: MembershipRepository + ?Sized,
{
    async fn list(&self, user_id: &UserId) -> Result<Vec<Miniature>, Error> {
        self.ledger.list_for(user_id).await
    }

    async fn contains(&self, user_id: &UserId, miniature_id: MiniatureId) -> Result<bool, Error> {
        self.ledger.contains(user_id, miniature_id).await
    }
}

#[cfg(test)]
#[path = "collection_service_tests.rs"]
mod tests;
