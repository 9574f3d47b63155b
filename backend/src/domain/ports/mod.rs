//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hasher) expose typed errors generated by
//! [`define_port_error`]; driving ports return the domain [`Error`] directly.
//!
//! [`Error`]: crate::domain::Error

mod macros;
pub(crate) use macros::define_port_error;

mod account_ports;
mod catalogue_ports;
mod collection_ports;
mod membership_repository;
mod miniature_repository;
mod password_hasher;
mod user_repository;

#[cfg(test)]
pub use account_ports::{MockAccountCommand, MockAccountQuery};
pub use account_ports::{AccountCommand, AccountQuery};
#[cfg(test)]
pub use catalogue_ports::{MockCatalogueCommand, MockCatalogueQuery};
pub use catalogue_ports::{CatalogueCommand, CatalogueListing, CatalogueQuery};
#[cfg(test)]
pub use collection_ports::{MockCollectionCommand, MockCollectionQuery};
pub use collection_ports::{CollectionCommand, CollectionQuery};
#[cfg(test)]
pub use membership_repository::MockMembershipRepository;
pub use membership_repository::{MembershipRepository, MembershipRepositoryError};
#[cfg(test)]
pub use miniature_repository::MockMiniatureRepository;
pub use miniature_repository::{MiniatureRepository, MiniatureRepositoryError, NewMiniature};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredUser, UserRepository, UserRepositoryError};
