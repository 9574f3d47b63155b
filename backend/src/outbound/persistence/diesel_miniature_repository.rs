//! PostgreSQL-backed `MiniatureRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MiniatureRepository, MiniatureRepositoryError, NewMiniature};
use crate::domain::{Miniature, MiniatureDetails, MiniatureId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{MiniatureChangeset, MiniatureRow, NewMiniatureRow};
use super::pool::{DbPool, PoolError};
use super::schema::miniatures;

/// Diesel-backed implementation of the miniature repository port.
#[derive(Clone)]
pub struct DieselMiniatureRepository {
    pool: DbPool,
}

impl DieselMiniatureRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MiniatureRepositoryError {
    map_basic_pool_error(error, MiniatureRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MiniatureRepositoryError {
    map_basic_diesel_error(
        error,
        MiniatureRepositoryError::query,
        MiniatureRepositoryError::connection,
    )
}

fn map_row(row: MiniatureRow) -> Result<Miniature, MiniatureRepositoryError> {
    row.into_miniature().map_err(MiniatureRepositoryError::query)
}

#[async_trait]
impl MiniatureRepository for DieselMiniatureRepository {
    async fn insert(
        &self,
        miniature: &NewMiniature,
    ) -> Result<Miniature, MiniatureRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = &miniature.details;
        let row = NewMiniatureRow {
            name: details.name(),
            brand: details.brand(),
            scale: details.scale(),
            year: details.year(),
            created_by: miniature.created_by.as_ref().map(|id| *id.as_uuid()),
            created_at: miniature.created_at,
        };
        let stored = diesel::insert_into(miniatures::table)
            .values(&row)
            .returning(MiniatureRow::as_returning())
            .get_result::<MiniatureRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        map_row(stored)
    }

    async fn find_by_id(
        &self,
        id: MiniatureId,
    ) -> Result<Option<Miniature>, MiniatureRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = miniatures::table
            .find(id.get())
            .select(MiniatureRow::as_select())
            .first::<MiniatureRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(map_row).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Miniature>, MiniatureRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MiniatureRow> = miniatures::table
            .order(miniatures::id.desc())
            .select(MiniatureRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(map_row).collect()
    }

    async fn update(
        &self,
        id: MiniatureId,
        details: &MiniatureDetails,
    ) -> Result<Option<Miniature>, MiniatureRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(miniatures::table.find(id.get()))
            .set(MiniatureChangeset::from(details))
            .returning(MiniatureRow::as_returning())
            .get_result::<MiniatureRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(map_row).transpose()
    }
}
