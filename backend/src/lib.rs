//! Minipedia backend library.
//!
//! Users curate personal collections of die-cast miniatures drawn from a
//! shared catalogue. The [`domain`] holds the membership ledger and the
//! permission gate; [`inbound`] and [`outbound`] adapt it to HTTP and storage.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
