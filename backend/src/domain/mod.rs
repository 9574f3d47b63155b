//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities used by the API and persistence
//! layers, plus the services implementing the driving ports. Types keep their
//! invariants in constructors and document serialisation contracts (serde) in
//! their Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - User, Role, CreatorPolicy: accounts and privilege levels.
//! - Miniature, MiniatureDetails: catalogue items.
//! - Membership, AddOutcome, RemoveOutcome, CollectionOrdering: the ledger's
//!   value types; [`MembershipLedger`] operates on them.
//! - PermissionGate: mutation and creation predicates.
//! - AccountService, CatalogueService, CollectionService: driving port
//!   implementations.

pub mod account_service;
pub mod auth;
pub mod catalogue_service;
pub mod collection;
pub mod collection_service;
pub mod error;
pub mod ledger;
pub mod miniature;
pub mod permissions;
pub mod ports;
pub mod role;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PasswordHash, Registration,
    RegistrationValidationError,
};
pub use self::catalogue_service::CatalogueService;
pub use self::collection::{
    AddOutcome, CollectionEntry, CollectionOrdering, CollectionOrderingParseError, Membership,
    RemoveOutcome,
};
pub use self::collection_service::CollectionService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ledger::MembershipLedger;
pub use self::miniature::{Miniature, MiniatureDetails, MiniatureId, MiniatureValidationError};
pub use self::permissions::PermissionGate;
pub use self::role::{CreatorPolicy, CreatorPolicyParseError, Role, RoleParseError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use minipedia::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
