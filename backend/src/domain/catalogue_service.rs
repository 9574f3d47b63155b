//! Catalogue domain service.
//!
//! Implements the catalogue driving ports. Every mutation resolves the acting
//! user first and then consults the [`PermissionGate`]; deletion goes through
//! [`MembershipLedger::remove_all_referencing`], which drops the memberships
//! and the miniature as one atomic unit.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::account_service::load_actor;
use crate::domain::ports::{
    CatalogueCommand, CatalogueListing, CatalogueQuery, MembershipRepository,
    MiniatureRepository, MiniatureRepositoryError, NewMiniature, UserRepository,
};
use crate::domain::{
    Error, MembershipLedger, Miniature, MiniatureDetails, MiniatureId, PermissionGate, UserId,
};

pub(crate) fn map_miniature_error(error: MiniatureRepositoryError) -> Error {
    match error {
        MiniatureRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("miniature repository unavailable: {message}"))
        }
        MiniatureRepositoryError::Query { message } => {
            Error::internal(format!("miniature repository error: {message}"))
        }
    }
}

pub(crate) fn miniature_not_found(id: MiniatureId) -> Error {
    Error::not_found(format!("miniature {id} not found"))
}

/// Resolve a miniature or fail with `NotFound`.
pub(crate) async fn load_miniature<M>(miniatures: &M, id: MiniatureId) -> Result<Miniature, Error>
where
    M: MiniatureRepository + ?Sized,
{
    miniatures
        .find_by_id(id)
        .await
        .map_err(map_miniature_error)?
        .ok_or_else(|| miniature_not_found(id))
}

/// Catalogue service implementing [`CatalogueCommand`] and [`CatalogueQuery`].
pub struct CatalogueService<U, M, R: ?Sized> {
    users: Arc<U>,
    miniatures: Arc<M>,
    ledger: MembershipLedger<R>,
    gate: PermissionGate,
    clock: Arc<dyn Clock>,
}

impl<U, M, R: ?Sized> Clone for CatalogueService<U, M, R> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            miniatures: Arc::clone(&self.miniatures),
            ledger: self.ledger.clone(),
            gate: self.gate.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<U, M, R> CatalogueService<U, M, R>
where
    U: UserRepository,
    M: MiniatureRepository,
    R: MembershipRepository + ?Sized,
{
    /// Create a catalogue service.
    pub fn new(
        users: Arc<U>,
        miniatures: Arc<M>,
        ledger: MembershipLedger<R>,
        gate: PermissionGate,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            miniatures,
            ledger,
            gate,
            clock,
        }
    }

    /// Load the actor and the target miniature, then apply the mutate gate.
    async fn authorise_mutation(&self, actor: &UserId, id: MiniatureId) -> Result<(), Error> {
        let actor = load_actor(self.users.as_ref(), actor).await?;
        let miniature = load_miniature(self.miniatures.as_ref(), id).await?;
        self.gate.require_mutate(&actor, &miniature)
    }
}

#[async_trait]
impl<U, M, R> CatalogueCommand for CatalogueService<U, M, R>
where
    U: UserRepository,
    M: MiniatureRepository,
    R: MembershipRepository + ?Sized,
{
    async fn create(&self, actor: &UserId, details: MiniatureDetails) -> Result<Miniature, Error> {
        let actor = load_actor(self.users.as_ref(), actor).await?;
        self.gate.require_create(&actor)?;
        let created = self
            .miniatures
            .insert(&NewMiniature {
                details,
                created_by: Some(*actor.id()),
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_miniature_error)?;
        info!(miniature_id = %created.id(), user_id = %actor.id(), "miniature created");
        Ok(created)
    }

    async fn update(
        &self,
        actor: &UserId,
        id: MiniatureId,
        details: MiniatureDetails,
    ) -> Result<Miniature, Error> {
        self.authorise_mutation(actor, id).await?;
        let updated = self
            .miniatures
            .update(id, &details)
            .await
            .map_err(map_miniature_error)?
            .ok_or_else(|| miniature_not_found(id))?;
        info!(miniature_id = %id, user_id = %actor, "miniature updated");
        Ok(updated)
    }

    async fn delete(&self, actor: &UserId, id: MiniatureId) -> Result<(), Error> {
        self.authorise_mutation(actor, id).await?;
        let removed = self
            .ledger
            .remove_all_referencing(id)
            .await?
            .ok_or_else(|| miniature_not_found(id))?;
        info!(
            miniature_id = %id,
            user_id = %actor,
            memberships_removed = removed,
            "miniature deleted"
        );
        Ok(())
    }
}

#[async_trait]
impl<U, M, R> CatalogueQuery for CatalogueService<U, M, R>
where
    U: UserRepository,
    M: MiniatureRepository,
    R: MembershipRepository + ?Sized,
{
    async fn list(&self, viewer: &UserId) -> Result<Vec<CatalogueListing>, Error> {
        let miniatures = self
            .miniatures
            .list_all()
            .await
            .map_err(map_miniature_error)?;
        let collected: HashSet<MiniatureId> =
            self.ledger.collected_ids(viewer).await?.into_iter().collect();
        Ok(miniatures
            .into_iter()
            .map(|miniature| CatalogueListing {
                in_collection: collected.contains(&miniature.id()),
                miniature,
            })
            .collect())
    }

    async fn get(&self, id: MiniatureId) -> Result<Miniature, Error> {
        load_miniature(self.miniatures.as_ref(), id).await
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
