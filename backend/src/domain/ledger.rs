//! Membership ledger: the uniqueness-constrained relation between users and
//! the miniatures in their collections.
//!
//! The ledger never decides uniqueness itself; the repository's conditional
//! insert does, so concurrent adds for one pair cannot both report `Added`.

use std::sync::Arc;

use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{MembershipRepository, MembershipRepositoryError};
use crate::domain::{
    AddOutcome, CollectionOrdering, Error, Membership, Miniature, MiniatureId, RemoveOutcome,
    UserId,
};

pub(crate) fn map_membership_error(error: MembershipRepositoryError) -> Error {
    match error {
        MembershipRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("membership repository unavailable: {message}"))
        }
        MembershipRepositoryError::Query { message } => {
            Error::internal(format!("membership repository error: {message}"))
        }
    }
}

/// Ledger operations over a [`MembershipRepository`].
///
/// Callers resolve user and miniature identifiers before calling in; the
/// ledger assumes both exist.
pub struct MembershipLedger<R: ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    ordering: CollectionOrdering,
}

impl<R: ?Sized> Clone for MembershipLedger<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            clock: Arc::clone(&self.clock),
            ordering: self.ordering,
        }
    }
}

impl<R> MembershipLedger<R>
where
    R: MembershipRepository + ?Sized,
{
    /// Create a ledger listing collections in `ordering`.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>, ordering: CollectionOrdering) -> Self {
        Self {
            repo,
            clock,
            ordering,
        }
    }

    /// Configured listing order.
    pub fn ordering(&self) -> CollectionOrdering {
        self.ordering
    }

    /// Add `miniature_id` to the user's collection.
    ///
    /// Idempotent: a second add for the same pair reports
    /// [`AddOutcome::AlreadyPresent`] and leaves storage untouched.
    pub async fn add(
        &self,
        user_id: &UserId,
        miniature_id: MiniatureId,
    ) -> Result<AddOutcome, Error> {
        let membership = Membership {
            user_id: *user_id,
            miniature_id,
            added_at: self.clock.utc(),
        };
        let outcome = self
            .repo
            .insert_if_absent(&membership)
            .await
            .map_err(map_membership_error)?;
        debug!(%user_id, %miniature_id, ?outcome, "collection add");
        Ok(outcome)
    }

    /// Remove `miniature_id` from the user's collection if present.
    pub async fn remove(
        &self,
        user_id: &UserId,
        miniature_id: MiniatureId,
    ) -> Result<RemoveOutcome, Error> {
        let outcome = self
            .repo
            .delete(user_id, miniature_id)
            .await
            .map_err(map_membership_error)?;
        debug!(%user_id, %miniature_id, ?outcome, "collection remove");
        Ok(outcome)
    }

    /// Whether the pair is recorded.
    pub async fn contains(&self, user_id: &UserId, miniature_id: MiniatureId) -> Result<bool, Error> {
        self.repo
            .exists(user_id, miniature_id)
            .await
            .map_err(map_membership_error)
    }

    /// Every miniature in the user's collection, in the configured order.
    pub async fn list_for(&self, user_id: &UserId) -> Result<Vec<Miniature>, Error> {
        let mut entries = self
            .repo
            .entries_for(user_id)
            .await
            .map_err(map_membership_error)?;
        self.ordering.sort(&mut entries);
        Ok(entries.into_iter().map(|entry| entry.miniature).collect())
    }

    /// Ids of every miniature in the user's collection.
    pub async fn collected_ids(&self, user_id: &UserId) -> Result<Vec<MiniatureId>, Error> {
        self.repo
            .collected_ids(user_id)
            .await
            .map_err(map_membership_error)
    }

    /// Drop every membership naming `miniature_id` and then the miniature
    /// itself, atomically.
    ///
    /// Returns `None` when the miniature does not exist, otherwise how many
    /// memberships went.
    pub async fn remove_all_referencing(
        &self,
        miniature_id: MiniatureId,
    ) -> Result<Option<usize>, Error> {
        let removed = self
            .repo
            .retire_miniature(miniature_id)
            .await
            .map_err(map_membership_error)?;
        debug!(%miniature_id, ?removed, "memberships removed for miniature");
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
