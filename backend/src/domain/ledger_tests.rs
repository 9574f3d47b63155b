//! Tests for the membership ledger service.

use std::sync::Arc;

use chrono::Duration;
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockMembershipRepository;
use crate::domain::{CollectionEntry, ErrorCode};
use crate::test_support::{MutableClock, fixture_timestamp, miniature};

#[fixture]
fn user_id() -> UserId {
    UserId::random()
}

fn ledger(
    repo: MockMembershipRepository,
    ordering: CollectionOrdering,
) -> MembershipLedger<MockMembershipRepository> {
    MembershipLedger::new(
        Arc::new(repo),
        Arc::new(MutableClock::new(fixture_timestamp())),
        ordering,
    )
}

#[rstest]
#[tokio::test]
async fn add_stamps_membership_with_clock(user_id: UserId) {
    let mut repo = MockMembershipRepository::new();
    repo.expect_insert_if_absent()
        .withf(move |membership| {
            membership.user_id == user_id
                && membership.miniature_id == MiniatureId::new(7)
                && membership.added_at == fixture_timestamp()
        })
        .times(1)
        .return_once(|_| Ok(AddOutcome::Added));

    let outcome = ledger(repo, CollectionOrdering::default())
        .add(&user_id, MiniatureId::new(7))
        .await
        .expect("add succeeds");

    assert_eq!(outcome, AddOutcome::Added);
}

#[rstest]
#[tokio::test]
async fn add_reports_already_present_without_error(user_id: UserId) {
    let mut repo = MockMembershipRepository::new();
    repo.expect_insert_if_absent()
        .times(1)
        .return_once(|_| Ok(AddOutcome::AlreadyPresent));

    let outcome = ledger(repo, CollectionOrdering::default())
        .add(&user_id, MiniatureId::new(7))
        .await
        .expect("duplicate add is not an error");

    assert_eq!(outcome, AddOutcome::AlreadyPresent);
}

#[rstest]
#[tokio::test]
async fn remove_passes_outcome_through(user_id: UserId) {
    let mut repo = MockMembershipRepository::new();
    repo.expect_delete()
        .with(eq(user_id), eq(MiniatureId::new(3)))
        .times(1)
        .return_once(|_, _| Ok(RemoveOutcome::NotPresent));

    let outcome = ledger(repo, CollectionOrdering::default())
        .remove(&user_id, MiniatureId::new(3))
        .await
        .expect("remove succeeds");

    assert_eq!(outcome, RemoveOutcome::NotPresent);
}

#[rstest]
#[case(
    MembershipRepositoryError::connection("pool exhausted"),
    ErrorCode::ServiceUnavailable
)]
#[case(MembershipRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn store_failures_propagate(
    user_id: UserId,
    #[case] failure: MembershipRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockMembershipRepository::new();
    repo.expect_insert_if_absent()
        .times(1)
        .return_once(move |_| Err(failure));

    let error = ledger(repo, CollectionOrdering::default())
        .add(&user_id, MiniatureId::new(1))
        .await
        .expect_err("store failure surfaces");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[case(CollectionOrdering::NewestItem, vec![9, 5, 2])]
#[case(CollectionOrdering::RecentlyAdded, vec![2, 9, 5])]
#[tokio::test]
async fn list_for_applies_configured_ordering(
    user_id: UserId,
    #[case] ordering: CollectionOrdering,
    #[case] expected: Vec<i64>,
) {
    let base = fixture_timestamp();
    let entries = vec![
        CollectionEntry {
            miniature: miniature(5, None),
            added_at: base,
        },
        CollectionEntry {
            miniature: miniature(2, None),
            added_at: base + Duration::minutes(10),
        },
        CollectionEntry {
            miniature: miniature(9, None),
            added_at: base + Duration::minutes(5),
        },
    ];
    let mut repo = MockMembershipRepository::new();
    repo.expect_entries_for()
        .times(1)
        .return_once(move |_| Ok(entries));

    let listed = ledger(repo, ordering)
        .list_for(&user_id)
        .await
        .expect("list succeeds");

    let ids: Vec<i64> = listed.iter().map(|m| m.id().get()).collect();
    assert_eq!(ids, expected);
}

#[rstest]
#[tokio::test]
async fn contains_reads_repository(user_id: UserId) {
    let mut repo = MockMembershipRepository::new();
    repo.expect_exists().times(1).return_once(|_, _| Ok(true));

    let present = ledger(repo, CollectionOrdering::default())
        .contains(&user_id, MiniatureId::new(4))
        .await
        .expect("lookup succeeds");

    assert!(present);
}

#[rstest]
#[tokio::test]
async fn remove_all_referencing_returns_count() {
    let mut repo = MockMembershipRepository::new();
    repo.expect_retire_miniature()
        .with(eq(MiniatureId::new(7)))
        .times(1)
        .return_once(|_| Ok(Some(3)));

    let removed = ledger(repo, CollectionOrdering::default())
        .remove_all_referencing(MiniatureId::new(7))
        .await
        .expect("cleanup succeeds");

    assert_eq!(removed, Some(3));
}
