//! Port for catalogue persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Miniature, MiniatureDetails, MiniatureId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by miniature repository adapters.
    pub enum MiniatureRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "miniature repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "miniature repository query failed: {message}",
    }
}

/// Insert payload for a new catalogue entry; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMiniature {
    pub details: MiniatureDetails,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Port for reading and writing catalogue entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MiniatureRepository: Send + Sync {
    /// Insert a miniature and return it with its assigned id.
    async fn insert(&self, miniature: &NewMiniature)
    -> Result<Miniature, MiniatureRepositoryError>;

    /// Find a miniature by id.
    async fn find_by_id(
        &self,
        id: MiniatureId,
    ) -> Result<Option<Miniature>, MiniatureRepositoryError>;

    /// Every miniature, highest id first.
    async fn list_all(&self) -> Result<Vec<Miniature>, MiniatureRepositoryError>;

    /// Replace the editable attributes; `None` when the id is unknown.
    async fn update(
        &self,
        id: MiniatureId,
        details: &MiniatureDetails,
    ) -> Result<Option<Miniature>, MiniatureRepositoryError>;
}
