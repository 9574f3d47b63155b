//! Driving ports for catalogue use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Miniature, MiniatureDetails, MiniatureId, UserId};

/// A catalogue row annotated with the viewer's collection membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueListing {
    pub miniature: Miniature,
    pub in_collection: bool,
}

/// Catalogue mutations, each gated by the permission predicates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueCommand: Send + Sync {
    /// Create a miniature recorded as created by `actor`.
    async fn create(&self, actor: &UserId, details: MiniatureDetails) -> Result<Miniature, Error>;

    /// Replace a miniature's attributes.
    async fn update(
        &self,
        actor: &UserId,
        id: MiniatureId,
        details: MiniatureDetails,
    ) -> Result<Miniature, Error>;

    /// Delete a miniature and every membership referencing it.
    async fn delete(&self, actor: &UserId, id: MiniatureId) -> Result<(), Error>;
}

/// Catalogue reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Every miniature, highest id first, flagged for `viewer`'s collection.
    async fn list(&self, viewer: &UserId) -> Result<Vec<CatalogueListing>, Error>;

    /// One miniature or `NotFound`.
    async fn get(&self, id: MiniatureId) -> Result<Miniature, Error>;
}
