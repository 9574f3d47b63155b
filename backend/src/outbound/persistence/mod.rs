//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and a `bb8` connection pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database failures are mapped onto each port's
//!   error enum.
//!
//! # Example
//!
//! ```ignore
//! use minipedia::outbound::persistence::{DbPool, DieselMiniatureRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/minipedia")).await?;
//! let miniatures = DieselMiniatureRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_membership_repository;
mod diesel_miniature_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_membership_repository::DieselMembershipRepository;
pub use diesel_miniature_repository::DieselMiniatureRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError, normalise_database_url};
