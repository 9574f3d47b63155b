//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, CatalogueCommand, CatalogueQuery, CollectionCommand,
    CollectionQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub catalogue: Arc<dyn CatalogueCommand>,
    pub catalogue_query: Arc<dyn CatalogueQuery>,
    pub collection: Arc<dyn CollectionCommand>,
    pub collection_query: Arc<dyn CollectionQuery>,
}

impl HttpState {
    /// Build state from services that implement both halves of each port
    /// pair.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use minipedia::domain::{
    ///     AccountService, CatalogueService, CollectionOrdering, CollectionService,
    ///     MembershipLedger, PermissionGate,
    /// };
    /// use minipedia::inbound::http::state::HttpState;
    /// use minipedia::outbound::memory::InMemoryStore;
    /// use minipedia::outbound::security::Pbkdf2PasswordHasher;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let clock = Arc::new(mockable::DefaultClock);
    /// let ledger = MembershipLedger::new(store.clone(), clock.clone(), CollectionOrdering::default());
    /// let state = HttpState::from_services(
    ///     Arc::new(AccountService::new(store.clone(), Arc::new(Pbkdf2PasswordHasher::default()))),
    ///     Arc::new(CatalogueService::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         ledger.clone(),
    ///         PermissionGate::default(),
    ///         clock,
    ///     )),
    ///     Arc::new(CollectionService::new(store, ledger)),
    /// );
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn from_services<A, C, L>(accounts: Arc<A>, catalogue: Arc<C>, collection: Arc<L>) -> Self
    where
        A: AccountCommand + AccountQuery + 'static,
        C: CatalogueCommand + CatalogueQuery + 'static,
        L: CollectionCommand + CollectionQuery + 'static,
    {
        Self {
            accounts: accounts.clone(),
            accounts_query: accounts,
            catalogue: catalogue.clone(),
            catalogue_query: catalogue,
            collection: collection.clone(),
            collection_query: collection,
        }
    }
}
