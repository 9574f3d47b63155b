//! PostgreSQL-backed `MembershipRepository`.
//!
//! `collection_entries` has a composite primary key on
//! `(user_id, miniature_id)`, so the database enforces pair uniqueness and
//! `ON CONFLICT DO NOTHING` tells the ledger whether the add wrote a row.
//! Retiring a miniature locks its row, then drops its memberships and the row
//! in one transaction.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{MembershipRepository, MembershipRepositoryError};
use crate::domain::{
    AddOutcome, CollectionEntry, Membership, MiniatureId, RemoveOutcome, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{MiniatureRow, NewMembershipRow};
use super::pool::{DbPool, PoolError};
use super::schema::{collection_entries, miniatures};

/// Diesel-backed implementation of the membership repository port.
#[derive(Clone)]
pub struct DieselMembershipRepository {
    pool: DbPool,
}

impl DieselMembershipRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MembershipRepositoryError {
    map_basic_pool_error(error, MembershipRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MembershipRepositoryError {
    map_basic_diesel_error(
        error,
        MembershipRepositoryError::query,
        MembershipRepositoryError::connection,
    )
}

#[async_trait]
impl MembershipRepository for DieselMembershipRepository {
    async fn insert_if_absent(
        &self,
        membership: &Membership,
    ) -> Result<AddOutcome, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewMembershipRow {
            user_id: *membership.user_id.as_uuid(),
            miniature_id: membership.miniature_id.get(),
            added_at: membership.added_at,
        };
        let written = diesel::insert_into(collection_entries::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(if written == 1 {
            AddOutcome::Added
        } else {
            AddOutcome::AlreadyPresent
        })
    }

    async fn delete(
        &self,
        user_id: &UserId,
        miniature_id: MiniatureId,
    ) -> Result<RemoveOutcome, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            collection_entries::table.find((*user_id.as_uuid(), miniature_id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(if removed == 0 {
            RemoveOutcome::NotPresent
        } else {
            RemoveOutcome::Removed
        })
    }

    async fn exists(
        &self,
        user_id: &UserId,
        miniature_id: MiniatureId,
    ) -> Result<bool, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            collection_entries::table.find((*user_id.as_uuid(), miniature_id.get())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn entries_for(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CollectionEntry>, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(MiniatureRow, chrono::DateTime<chrono::Utc>)> = collection_entries::table
            .inner_join(miniatures::table)
            .filter(collection_entries::user_id.eq(user_id.as_uuid()))
            .select((MiniatureRow::as_select(), collection_entries::added_at))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, added_at)| {
                let miniature = row
                    .into_miniature()
                    .map_err(MembershipRepositoryError::query)?;
                Ok(CollectionEntry {
                    miniature,
                    added_at,
                })
            })
            .collect()
    }

    async fn collected_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<MiniatureId>, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<i64> = collection_entries::table
            .filter(collection_entries::user_id.eq(user_id.as_uuid()))
            .select(collection_entries::miniature_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(MiniatureId::new).collect())
    }

    async fn retire_miniature(
        &self,
        miniature_id: MiniatureId,
    ) -> Result<Option<usize>, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = miniature_id.get();
        let outcome = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let locked = miniatures::table
                        .find(id)
                        .select(miniatures::id)
                        .for_update()
                        .first::<i64>(conn)
                        .await
                        .optional()?;
                    if locked.is_none() {
                        return Ok(None);
                    }
                    let removed = diesel::delete(
                        collection_entries::table.filter(collection_entries::miniature_id.eq(id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(miniatures::table.find(id))
                        .execute(conn)
                        .await?;
                    Ok(Some(removed))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        if let Some(removed) = outcome {
            debug!(miniature_id = id, removed, "retired miniature");
        }
        Ok(outcome)
    }
}
