//! Tests for the collection service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockMembershipRepository, MockMiniatureRepository};
use crate::domain::{CollectionOrdering, ErrorCode};
use crate::test_support::{MutableClock, fixture_timestamp, miniature};

fn service(
    miniatures: MockMiniatureRepository,
    memberships: MockMembershipRepository,
) -> CollectionService<MockMiniatureRepository, MockMembershipRepository> {
    CollectionService::new(
        Arc::new(miniatures),
        MembershipLedger::new(
            Arc::new(memberships),
            Arc::new(MutableClock::new(fixture_timestamp())),
            CollectionOrdering::default(),
        ),
    )
}

fn known_miniature() -> MockMiniatureRepository {
    let mut miniatures = MockMiniatureRepository::new();
    miniatures
        .expect_find_by_id()
        .returning(|id| Ok(Some(miniature(id.get(), None))));
    miniatures
}

#[tokio::test]
async fn add_of_unknown_miniature_is_not_found() {
    let mut miniatures = MockMiniatureRepository::new();
    miniatures.expect_find_by_id().return_once(|_| Ok(None));
    let mut memberships = MockMembershipRepository::new();
    memberships.expect_insert_if_absent().times(0);

    let error = service(miniatures, memberships)
        .add(&UserId::random(), MiniatureId::new(404))
        .await
        .expect_err("unknown miniature");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn remove_of_unknown_miniature_is_not_found() {
    let mut miniatures = MockMiniatureRepository::new();
    miniatures.expect_find_by_id().return_once(|_| Ok(None));
    let mut memberships = MockMembershipRepository::new();
    memberships.expect_delete().times(0);

    let error = service(miniatures, memberships)
        .remove(&UserId::random(), MiniatureId::new(404))
        .await
        .expect_err("unknown miniature");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn add_delegates_to_ledger() {
    let mut memberships = MockMembershipRepository::new();
    memberships
        .expect_insert_if_absent()
        .times(1)
        .return_once(|_| Ok(AddOutcome::Added));

    let outcome = service(known_miniature(), memberships)
        .add(&UserId::random(), MiniatureId::new(7))
        .await
        .expect("add succeeds");

    assert_eq!(outcome, AddOutcome::Added);
}

#[tokio::test]
async fn remove_reports_not_present() {
    let mut memberships = MockMembershipRepository::new();
    memberships
        .expect_delete()
        .times(1)
        .return_once(|_, _| Ok(RemoveOutcome::NotPresent));

    let outcome = service(known_miniature(), memberships)
        .remove(&UserId::random(), MiniatureId::new(7))
        .await
        .expect("remove succeeds");

    assert_eq!(outcome, RemoveOutcome::NotPresent);
}
