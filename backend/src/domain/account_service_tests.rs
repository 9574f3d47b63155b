//! Tests for the account service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockUserRepository, StoredUser};
use crate::test_support::user_with_role;

fn service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
) -> AccountService<MockUserRepository, MockPasswordHasher> {
    AccountService::new(Arc::new(users), Arc::new(hasher))
}

fn hasher_accepting(password: &'static str) -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new("hashed")));
    hasher
        .expect_verify()
        .returning(move |candidate, _| Ok(candidate == password));
    hasher
}

fn registration() -> Registration {
    Registration::try_from_parts(" ana ", "Ana@Example.com", "s3cret").expect("valid registration")
}

#[tokio::test]
async fn register_stores_hash_and_defaults_role() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user, hash| {
            user.username().as_ref() == "ana"
                && user.email().as_ref() == "ana@example.com"
                && user.role() == Role::User
                && hash.as_str() == "hashed"
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let user = service(users, hasher_accepting("s3cret"))
        .register(registration())
        .await
        .expect("registration succeeds");

    assert_eq!(user.role(), Role::User);
    assert_eq!(user.username().as_ref(), "ana");
}

#[rstest]
#[case(UserRepositoryError::duplicate_username("ana"), "username")]
#[case(UserRepositoryError::duplicate_email("ana@example.com"), "email")]
#[tokio::test]
async fn register_duplicates_are_conflicts(
    #[case] failure: UserRepositoryError,
    #[case] field: &str,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .times(1)
        .return_once(move |_, _| Err(failure));

    let error = service(users, hasher_accepting("s3cret"))
        .register(registration())
        .await
        .expect_err("duplicate rejected");

    assert_eq!(error.code(), ErrorCode::Conflict);
    let details = error.details().expect("conflict details");
    assert_eq!(details["field"], field);
}

#[rstest]
#[case::unknown_user(None, "s3cret")]
#[case::wrong_password(Some("ana"), "guess")]
#[tokio::test]
async fn authentication_failures_share_one_message(
    #[case] existing: Option<&'static str>,
    #[case] password: &str,
) {
    let stored = existing.map(|name| StoredUser {
        user: user_with_role(name, Role::User),
        password_hash: PasswordHash::new("hashed"),
    });
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .times(1)
        .return_once(move |_| Ok(stored));

    let credentials = LoginCredentials::try_from_parts("ana", password).expect("credentials");
    let error = service(users, hasher_accepting("s3cret"))
        .authenticate(&credentials)
        .await
        .expect_err("login rejected");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "invalid credentials");
}

#[tokio::test]
async fn authenticate_returns_user_id_on_match() {
    let ana = user_with_role("ana", Role::User);
    let expected = *ana.id();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .withf(|name| name == "ana")
        .times(1)
        .return_once(move |_| {
            Ok(Some(StoredUser {
                user: ana,
                password_hash: PasswordHash::new("hashed"),
            }))
        });

    let credentials = LoginCredentials::try_from_parts("ana", "s3cret").expect("credentials");
    let id = service(users, hasher_accepting("s3cret"))
        .authenticate(&credentials)
        .await
        .expect("login succeeds");

    assert_eq!(id, expected);
}

#[tokio::test]
async fn current_user_for_vanished_account_is_unauthorized() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));

    let error = service(users, MockPasswordHasher::new())
        .current_user(&UserId::random())
        .await
        .expect_err("unknown session user");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[case(Role::User)]
#[case(Role::Editor)]
#[tokio::test]
async fn list_users_requires_admin(#[case] role: Role) {
    let actor = user_with_role("bob", role);
    let actor_id = *actor.id();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(actor)));
    users.expect_list_all().times(0);

    let error = service(users, MockPasswordHasher::new())
        .list_users(&actor_id)
        .await
        .expect_err("non-admin rejected");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn change_role_for_missing_target_is_not_found() {
    let admin = user_with_role("root", Role::Admin);
    let admin_id = *admin.id();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(admin)));
    users.expect_update_role().return_once(|_, _| Ok(None));

    let error = service(users, MockPasswordHasher::new())
        .change_role(&admin_id, &UserId::random(), Role::Editor)
        .await
        .expect_err("missing target");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn change_role_by_admin_returns_updated_user() {
    let admin = user_with_role("root", Role::Admin);
    let admin_id = *admin.id();
    let target = user_with_role("bob", Role::User);
    let target_id = *target.id();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(admin)));
    users
        .expect_update_role()
        .withf(move |id, role| *id == target_id && *role == Role::Editor)
        .return_once(move |_, role| Ok(Some(target.with_role(role))));

    let updated = service(users, MockPasswordHasher::new())
        .change_role(&admin_id, &target_id, Role::Editor)
        .await
        .expect("role change succeeds");

    assert_eq!(updated.role(), Role::Editor);
}

#[tokio::test]
async fn bootstrap_admin_skips_existing_username() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().return_once(|_| {
        Ok(Some(StoredUser {
            user: user_with_role("admin", Role::Admin),
            password_hash: PasswordHash::new("hashed"),
        }))
    });
    users.expect_insert().times(0);

    let admin = Registration::try_from_parts("admin", "admin@minipedia.com", "pw")
        .expect("valid registration");
    let created = service(users, MockPasswordHasher::new())
        .ensure_bootstrap_admin(&admin)
        .await
        .expect("bootstrap succeeds");

    assert!(created.is_none());
}

#[tokio::test]
async fn bootstrap_admin_creates_admin_role() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().return_once(|_| Ok(None));
    users
        .expect_insert()
        .withf(|user, _| user.role() == Role::Admin)
        .times(1)
        .return_once(|_, _| Ok(()));

    let admin = Registration::try_from_parts("admin", "admin@minipedia.com", "pw")
        .expect("valid registration");
    let created = service(users, hasher_accepting("pw"))
        .ensure_bootstrap_admin(&admin)
        .await
        .expect("bootstrap succeeds")
        .expect("admin created");

    assert!(created.role().is_admin());
}

#[tokio::test]
async fn connection_failures_are_service_unavailable() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(|_| Err(UserRepositoryError::connection("refused")));

    let error = service(users, MockPasswordHasher::new())
        .current_user(&UserId::random())
        .await
        .expect_err("store down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
