//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};

use crate::domain::ports::{PasswordHasher, UserRepository};
use crate::domain::{
    AccountService, CatalogueService, CollectionOrdering, CollectionService, CreatorPolicy,
    MembershipLedger, PermissionGate, Role, User,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::Pbkdf2PasswordHasher;
use crate::test_support::{MutableClock, fixture_timestamp, user_with_role};

/// Password given to every seeded user.
pub const TEST_PASSWORD: &str = "password";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Real services over an in-memory store.
pub struct MemoryFixture {
    pub store: Arc<InMemoryStore>,
    pub state: HttpState,
    hasher: Pbkdf2PasswordHasher,
}

impl MemoryFixture {
    /// Fixture with the default creator policy.
    pub fn new() -> Self {
        Self::with_policy(CreatorPolicy::default())
    }

    /// Fixture whose catalogue uses `policy`.
    pub fn with_policy(policy: CreatorPolicy) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let hasher = Pbkdf2PasswordHasher::new(1);
        let clock = Arc::new(MutableClock::new(fixture_timestamp()));
        let ledger = MembershipLedger::new(store.clone(), clock.clone(), CollectionOrdering::default());
        let state = HttpState::from_services(
            Arc::new(AccountService::new(store.clone(), Arc::new(hasher))),
            Arc::new(CatalogueService::new(
                store.clone(),
                store.clone(),
                ledger.clone(),
                PermissionGate::new(policy),
                clock,
            )),
            Arc::new(CollectionService::new(store.clone(), ledger)),
        );
        Self {
            store,
            state,
            hasher,
        }
    }

    /// Insert a user whose password is [`TEST_PASSWORD`].
    pub async fn seed_user(&self, username: &str, role: Role) -> User {
        let user = user_with_role(username, role);
        let hash = self.hasher.hash(TEST_PASSWORD).expect("hash");
        UserRepository::insert(self.store.as_ref(), &user, &hash)
            .await
            .expect("seed user");
        user
    }

    /// App exposing every API route under `/api/v1` with a test session.
    pub fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .service(
                web::scope("/api/v1")
                    .wrap(test_session_middleware())
                    .configure(super::configure),
            )
    }
}

/// Log `username` in with [`TEST_PASSWORD`] and return the session cookie.
pub async fn login_cookie<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({"username": username, "password": TEST_PASSWORD}))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed for {username}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
