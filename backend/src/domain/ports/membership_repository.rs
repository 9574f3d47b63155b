//! Port for the membership ledger's storage.
//!
//! Adapters own the uniqueness guarantee: at most one row per
//! `(user, miniature)` pair, with the insert reporting whether it wrote.

use async_trait::async_trait;

use crate::domain::{AddOutcome, CollectionEntry, Membership, MiniatureId, RemoveOutcome, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by membership repository adapters.
    pub enum MembershipRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "membership repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "membership repository query failed: {message}",
    }
}

/// Port for reading and writing collection memberships.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Insert the membership unless the pair already exists.
    async fn insert_if_absent(
        &self,
        membership: &Membership,
    ) -> Result<AddOutcome, MembershipRepositoryError>;

    /// Delete the pair if present.
    async fn delete(
        &self,
        user_id: &UserId,
        miniature_id: MiniatureId,
    ) -> Result<RemoveOutcome, MembershipRepositoryError>;

    /// Whether the pair exists.
    async fn exists(
        &self,
        user_id: &UserId,
        miniature_id: MiniatureId,
    ) -> Result<bool, MembershipRepositoryError>;

    /// Every collected miniature for the user with its `added_at`, unordered.
    async fn entries_for(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CollectionEntry>, MembershipRepositoryError>;

    /// Ids of every miniature the user has collected.
    async fn collected_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<MiniatureId>, MembershipRepositoryError>;

    /// Delete every membership naming the miniature and then the miniature
    /// itself as one atomic unit.
    ///
    /// Returns `None` when the miniature does not exist (nothing is removed),
    /// otherwise the number of memberships that were dropped.
    async fn retire_miniature(
        &self,
        miniature_id: MiniatureId,
    ) -> Result<Option<usize>, MembershipRepositoryError>;
}
