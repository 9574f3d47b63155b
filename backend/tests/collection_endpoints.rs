//! End-to-end collection behaviour over the in-memory store.
//!
//! The app is assembled from the library's public surface exactly as the
//! server does it, with a plain-HTTP test session.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use minipedia::Trace;
use minipedia::domain::{
    AccountService, CatalogueService, CollectionOrdering, CollectionService, MembershipLedger,
    PermissionGate, Registration,
};
use minipedia::inbound::http::configure;
use minipedia::inbound::http::state::HttpState;
use minipedia::outbound::memory::InMemoryStore;
use minipedia::outbound::security::Pbkdf2PasswordHasher;
use minipedia::test_support::{MutableClock, fixture_timestamp};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const PASSWORD: &str = "hunter22";

struct Harness {
    store: Arc<InMemoryStore>,
    state: HttpState,
}

#[fixture]
async fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(MutableClock::new(fixture_timestamp()));
    let accounts = Arc::new(AccountService::new(
        store.clone(),
        Arc::new(Pbkdf2PasswordHasher::new(1)),
    ));
    let root = Registration::try_from_parts("root", "root@minipedia.com", PASSWORD)
        .expect("valid registration");
    accounts
        .ensure_bootstrap_admin(&root)
        .await
        .expect("bootstrap admin");

    let ledger = MembershipLedger::new(store.clone(), clock.clone(), CollectionOrdering::default());
    let state = HttpState::from_services(
        accounts,
        Arc::new(CatalogueService::new(
            store.clone(),
            store.clone(),
            ledger.clone(),
            PermissionGate::default(),
            clock,
        )),
        Arc::new(CollectionService::new(store.clone(), ledger)),
    );
    Harness { store, state }
}

fn app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(web::scope("/api/v1").wrap(session).configure(configure))
}

async fn send<S>(app: &S, request: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn login<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": username, "password": PASSWORD}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login as {username}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Register `ana`, have `root` publish seven miniatures, and log ana in.
async fn ana_and_seven_miniatures<S>(app: &S) -> (Cookie<'static>, Cookie<'static>)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, _) = send(
        app,
        test::TestRequest::post().uri("/api/v1/register").set_json(json!({
            "username": "ana",
            "email": "ana@example.com",
            "password": PASSWORD
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let root = login(app, "root").await;
    for n in 1..=7 {
        let (status, body) = send(
            app,
            test::TestRequest::post()
                .uri("/api/v1/miniatures")
                .cookie(root.clone())
                .set_json(json!({
                    "name": format!("Model {n}"),
                    "brand": "Tomica",
                    "scale": "1:64",
                    "year": "1999"
                })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], n);
    }
    (login(app, "ana").await, root)
}

#[rstest]
#[actix_web::test]
async fn ana_adds_seven_twice(#[future] harness: Harness) {
    let harness = harness.await;
    let app = test::init_service(app(harness.state.clone())).await;
    let (ana, _) = ana_and_seven_miniatures(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/collection/7")
            .cookie(ana.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"], "added");
    assert_eq!(body["miniatureId"], 7);

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/collection/7")
            .cookie(ana.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "already_present");
    assert_eq!(body["message"], "Miniature is already in your collection.");

    let (status, body) = send(
        &app,
        test::TestRequest::get().uri("/api/v1/collection").cookie(ana),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .expect("collection array")
        .iter()
        .filter_map(|item| item["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![7]);
    assert_eq!(harness.store.membership_count(), Some(1));
}

#[rstest]
#[actix_web::test]
async fn concurrent_adds_store_one_membership(#[future] harness: Harness) {
    let harness = harness.await;
    let app = test::init_service(app(harness.state.clone())).await;
    let (ana, _) = ana_and_seven_miniatures(&app).await;

    let first = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/collection/3")
            .cookie(ana.clone()),
    );
    let second = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/collection/3")
            .cookie(ana.clone()),
    );
    let ((first_status, first_body), (second_status, second_body)) =
        futures_util::join!(first, second);

    let mut outcomes = vec![
        first_body["outcome"].as_str().map(str::to_owned),
        second_body["outcome"].as_str().map(str::to_owned),
    ];
    outcomes.sort();
    assert_eq!(
        outcomes,
        vec![Some("added".to_owned()), Some("already_present".to_owned())]
    );
    let mut statuses = vec![first_status, second_status];
    statuses.sort_by_key(StatusCode::as_u16);
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CREATED]);
    assert_eq!(harness.store.membership_count(), Some(1));
}

#[rstest]
#[actix_web::test]
async fn deleting_a_miniature_empties_collections(#[future] harness: Harness) {
    let harness = harness.await;
    let app = test::init_service(app(harness.state.clone())).await;
    let (ana, root) = ana_and_seven_miniatures(&app).await;

    for id in [7, 5] {
        let (status, _) = send(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/collection/{id}"))
                .cookie(ana.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = send(
        &app,
        test::TestRequest::delete()
            .uri("/api/v1/miniatures/7")
            .cookie(root),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(
        &app,
        test::TestRequest::get().uri("/api/v1/collection").cookie(ana.clone()),
    )
    .await;
    let ids: Vec<i64> = body
        .as_array()
        .expect("collection array")
        .iter()
        .filter_map(|item| item["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![5]);

    let (status, body) = send(
        &app,
        test::TestRequest::delete()
            .uri("/api/v1/collection/7")
            .cookie(ana),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn plain_users_cannot_publish(#[future] harness: Harness) {
    let harness = harness.await;
    let app = test::init_service(app(harness.state)).await;
    let (ana, _) = ana_and_seven_miniatures(&app).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/miniatures")
            .cookie(ana)
            .set_json(json!({"name": "GT-R", "brand": "Tomica", "scale": "1:64", "year": "1999"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");
}
