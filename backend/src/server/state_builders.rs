//! Storage selection and service wiring for the HTTP state.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::{Clock, DefaultClock, DefaultEnv};
use tracing::{info, warn};

use minipedia::domain::ports::{MembershipRepository, MiniatureRepository, UserRepository};
use minipedia::domain::{
    AccountService, CatalogueService, CollectionOrdering, CollectionService, CreatorPolicy,
    MembershipLedger, PermissionGate, Registration,
};
use minipedia::inbound::http::state::HttpState;
use minipedia::outbound::memory::InMemoryStore;
use minipedia::outbound::persistence::{
    DbPool, DieselMembershipRepository, DieselMiniatureRepository, DieselUserRepository,
    PoolConfig, run_migrations,
};
use minipedia::outbound::security::Pbkdf2PasswordHasher;

use super::settings::AppSettings;

/// Domain knobs shared by both storage backends.
#[derive(Debug, Clone, Default)]
pub(crate) struct WiringOptions {
    pub(crate) creator_policy: CreatorPolicy,
    pub(crate) ordering: CollectionOrdering,
    pub(crate) bootstrap_admin: Option<Registration>,
}

impl WiringOptions {
    pub(crate) fn from_settings(settings: &AppSettings) -> Result<Self> {
        Ok(Self {
            creator_policy: settings.creator_policy()?,
            ordering: settings.collection_ordering()?,
            bootstrap_admin: settings.bootstrap_admin()?,
        })
    }
}

/// Select PostgreSQL when a database URL is configured, else the in-memory
/// store, and wire the services over it.
pub(crate) async fn build_http_state(settings: &AppSettings) -> Result<HttpState> {
    let options = WiringOptions::from_settings(settings)?;
    match settings.database_url(&DefaultEnv::new()) {
        Some(url) => {
            run_migrations(&url)
                .await
                .wrap_err("database migrations failed")?;
            let pool = DbPool::new(PoolConfig::new(&url).with_max_size(settings.pool_max_size()))
                .await
                .wrap_err("failed to build database pool")?;
            info!(backend = "postgres", "storage selected");
            wire_services(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselMiniatureRepository::new(pool.clone())),
                Arc::new(DieselMembershipRepository::new(pool)),
                options,
            )
            .await
        }
        None => {
            warn!("no database configured; data lives in memory and is lost on restart");
            info!(backend = "memory", "storage selected");
            let store = Arc::new(InMemoryStore::new());
            wire_services(store.clone(), store.clone(), store, options).await
        }
    }
}

pub(crate) async fn wire_services<U, M, R>(
    users: Arc<U>,
    miniatures: Arc<M>,
    memberships: Arc<R>,
    options: WiringOptions,
) -> Result<HttpState>
where
    U: UserRepository + 'static,
    M: MiniatureRepository + 'static,
    R: MembershipRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let accounts = Arc::new(AccountService::new(
        users.clone(),
        Arc::new(Pbkdf2PasswordHasher::default()),
    ));
    if let Some(admin) = &options.bootstrap_admin {
        accounts
            .ensure_bootstrap_admin(admin)
            .await
            .map_err(|error| eyre!("bootstrap administrator failed: {error}"))?;
    }

    let ledger = MembershipLedger::new(memberships, clock.clone(), options.ordering);
    let catalogue = CatalogueService::new(
        users,
        miniatures.clone(),
        ledger.clone(),
        PermissionGate::new(options.creator_policy),
        clock,
    );
    let collection = CollectionService::new(miniatures, ledger);
    Ok(HttpState::from_services(
        accounts,
        Arc::new(catalogue),
        Arc::new(collection),
    ))
}
