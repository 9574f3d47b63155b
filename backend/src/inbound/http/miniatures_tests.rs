//! Tests for catalogue API handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::ports::CollectionCommand;
use crate::domain::{CreatorPolicy, MiniatureId, Role};
use crate::inbound::http::test_utils::{MemoryFixture, login_cookie};

fn gt_r() -> Value {
    json!({"name": "Skyline GT-R R34", "brand": "Tomica", "scale": "1:64", "year": "1999"})
}

async fn read_json(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("json body")
}

#[actix_web::test]
async fn editor_creates_and_owns_a_miniature() {
    let fixture = MemoryFixture::new();
    let eve = fixture.seed_user("eve", Role::Editor).await;
    let app = actix_test::init_service(fixture.app()).await;
    let cookie = login_cookie(&app, "eve").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/miniatures")
            .cookie(cookie)
            .set_json(gt_r())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["createdBy"], eve.id().to_string());
}

#[rstest]
#[case(CreatorPolicy::default(), StatusCode::FORBIDDEN)]
#[case(CreatorPolicy::AnyUser, StatusCode::CREATED)]
#[actix_web::test]
async fn creator_policy_gates_plain_users(
    #[case] policy: CreatorPolicy,
    #[case] expected: StatusCode,
) {
    let fixture = MemoryFixture::with_policy(policy);
    fixture.seed_user("ana", Role::User).await;
    let app = actix_test::init_service(fixture.app()).await;
    let cookie = login_cookie(&app, "ana").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/miniatures")
            .cookie(cookie)
            .set_json(gt_r())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), expected);
}

#[actix_web::test]
async fn blank_attributes_are_rejected() {
    let fixture = MemoryFixture::new();
    fixture.seed_user("eve", Role::Editor).await;
    let app = actix_test::init_service(fixture.app()).await;
    let cookie = login_cookie(&app, "eve").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/miniatures")
            .cookie(cookie)
            .set_json(json!({"name": "GT-R", "brand": " ", "scale": "1:64", "year": "1999"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["details"]["field"], "brand");
}

#[actix_web::test]
async fn only_creator_or_admin_may_update() {
    let fixture = MemoryFixture::new();
    fixture.seed_user("eve", Role::Editor).await;
    fixture.seed_user("ed", Role::Editor).await;
    fixture.seed_user("root", Role::Admin).await;
    let app = actix_test::init_service(fixture.app()).await;

    let eve = login_cookie(&app, "eve").await;
    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/miniatures")
            .cookie(eve)
            .set_json(gt_r())
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let renamed = json!({"name": "Supra", "brand": "Tomica", "scale": "1:64", "year": "1993"});
    let ed = login_cookie(&app, "ed").await;
    let denied = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/miniatures/1")
            .cookie(ed)
            .set_json(renamed.clone())
            .to_request(),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let root = login_cookie(&app, "root").await;
    let allowed = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/miniatures/1")
            .cookie(root)
            .set_json(renamed)
            .to_request(),
    )
    .await;
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(read_json(allowed).await["name"], "Supra");
}

#[actix_web::test]
async fn delete_removes_memberships_and_listing_flags_collection() {
    let fixture = MemoryFixture::new();
    let ana = fixture.seed_user("ana", Role::User).await;
    fixture.seed_user("eve", Role::Editor).await;
    let app = actix_test::init_service(fixture.app()).await;
    let eve = login_cookie(&app, "eve").await;

    for _ in 0..2 {
        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/miniatures")
                .cookie(eve.clone())
                .set_json(gt_r())
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
    }
    fixture
        .state
        .collection
        .add(ana.id(), MiniatureId::new(1))
        .await
        .expect("add");

    let ana_cookie = login_cookie(&app, "ana").await;
    let listing = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/miniatures")
            .cookie(ana_cookie.clone())
            .to_request(),
    )
    .await;
    let body = read_json(listing).await;
    let flags: Vec<(i64, bool)> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|row| {
            (
                row["id"].as_i64().expect("id"),
                row["inCollection"].as_bool().expect("flag"),
            )
        })
        .collect();
    assert_eq!(flags, vec![(2, false), (1, true)]);

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/miniatures/1")
            .cookie(eve)
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    assert_eq!(fixture.store.membership_count(), Some(0));

    let gone = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/miniatures/1")
            .cookie(ana_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn catalogue_requires_login() {
    let fixture = MemoryFixture::new();
    let app = actix_test::init_service(fixture.app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/miniatures").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
