//! Membership ledger value types: memberships, mutation outcomes and listing
//! order.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Miniature, MiniatureId, UserId};

/// A single `(user, miniature)` pair in someone's collection.
///
/// At most one membership exists per pair; storage adapters enforce this with
/// a composite key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub user_id: UserId,
    pub miniature_id: MiniatureId,
    pub added_at: DateTime<Utc>,
}

/// A collected miniature together with the moment it was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionEntry {
    pub miniature: Miniature,
    pub added_at: DateTime<Utc>,
}

/// Result of adding a miniature to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    /// A new membership row was written.
    Added,
    /// The pair already existed; nothing changed.
    AlreadyPresent,
}

/// Result of removing a miniature from a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RemoveOutcome {
    /// The membership row was deleted.
    Removed,
    /// No membership existed; nothing changed.
    NotPresent,
}

/// Sort order for a user's collection listing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CollectionOrdering {
    /// Highest miniature id first.
    #[default]
    NewestItem,
    /// Most recently added membership first; ties broken by id descending.
    RecentlyAdded,
    /// Most recently created miniature first; ties broken by id descending.
    ItemCreated,
}

impl CollectionOrdering {
    /// Stable configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewestItem => "newest_item",
            Self::RecentlyAdded => "recently_added",
            Self::ItemCreated => "item_created",
        }
    }

    /// Sort `entries` in place.
    pub fn sort(self, entries: &mut [CollectionEntry]) {
        match self {
            Self::NewestItem => entries.sort_by_key(|entry| Reverse(entry.miniature.id())),
            Self::RecentlyAdded => {
                entries.sort_by_key(|entry| Reverse((entry.added_at, entry.miniature.id())));
            }
            Self::ItemCreated => entries.sort_by_key(|entry| {
                Reverse((entry.miniature.created_at(), entry.miniature.id()))
            }),
        }
    }
}

impl fmt::Display for CollectionOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for unknown ordering names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown collection ordering '{value}'; expected newest_item|recently_added|item_created")]
pub struct CollectionOrderingParseError {
    value: String,
}

impl FromStr for CollectionOrdering {
    type Err = CollectionOrderingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest_item" => Ok(Self::NewestItem),
            "recently_added" => Ok(Self::RecentlyAdded),
            "item_created" => Ok(Self::ItemCreated),
            _ => Err(CollectionOrderingParseError {
                value: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::MiniatureDetails;
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn entry(id: i64, created_offset: i64, added_offset: i64) -> CollectionEntry {
        let details =
            MiniatureDetails::try_from_parts("Model", "Brand", "1:64", "2000").expect("valid");
        CollectionEntry {
            miniature: Miniature::new(
                MiniatureId::new(id),
                details,
                None,
                base_time() + Duration::minutes(created_offset),
            ),
            added_at: base_time() + Duration::minutes(added_offset),
        }
    }

    #[fixture]
    fn entries() -> Vec<CollectionEntry> {
        // id 1 created last, id 3 added last, id 2 ties id 3 on creation time.
        vec![entry(1, 30, 0), entry(3, 10, 20), entry(2, 10, 5)]
    }

    fn ids(entries: &[CollectionEntry]) -> Vec<i64> {
        entries.iter().map(|e| e.miniature.id().get()).collect()
    }

    #[rstest]
    #[case(CollectionOrdering::NewestItem, vec![3, 2, 1])]
    #[case(CollectionOrdering::RecentlyAdded, vec![3, 2, 1])]
    #[case(CollectionOrdering::ItemCreated, vec![1, 3, 2])]
    fn sorts_by_configured_order(
        mut entries: Vec<CollectionEntry>,
        #[case] ordering: CollectionOrdering,
        #[case] expected: Vec<i64>,
    ) {
        ordering.sort(&mut entries);
        assert_eq!(ids(&entries), expected);
    }

    #[rstest]
    fn recently_added_breaks_ties_by_id() {
        let mut entries = vec![entry(4, 0, 10), entry(9, 0, 10), entry(6, 0, 11)];
        CollectionOrdering::RecentlyAdded.sort(&mut entries);
        assert_eq!(ids(&entries), vec![6, 9, 4]);
    }

    #[rstest]
    #[case("newest_item", CollectionOrdering::NewestItem)]
    #[case(" Recently_Added ", CollectionOrdering::RecentlyAdded)]
    #[case("item_created", CollectionOrdering::ItemCreated)]
    fn parses_names(#[case] raw: &str, #[case] expected: CollectionOrdering) {
        assert_eq!(raw.parse::<CollectionOrdering>().expect("valid"), expected);
    }

    #[rstest]
    fn rejects_unknown_name() {
        assert!("alphabetical".parse::<CollectionOrdering>().is_err());
    }

    #[rstest]
    fn outcomes_serialise_snake_case() {
        assert_eq!(
            serde_json::to_value(AddOutcome::AlreadyPresent).expect("serialises"),
            serde_json::json!("already_present")
        );
        assert_eq!(
            serde_json::to_value(RemoveOutcome::NotPresent).expect("serialises"),
            serde_json::json!("not_present")
        );
    }
}
