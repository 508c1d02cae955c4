//! PostgreSQL-backed [`ItemRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::item::{Item, ItemPatch, NewItem};
use crate::domain::ports::{ItemRepository, ItemRepositoryError};

use super::error_mapping::{map_diesel_error, map_diesel_write_error, map_pool_error};
use super::models::{ItemChangeset, ItemRow, NewItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::items;

/// Diesel-backed implementation of the item repository port.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ItemRepositoryError {
    map_pool_error(error, ItemRepositoryError::connection)
}

fn map_read(error: diesel::result::Error) -> ItemRepositoryError {
    map_diesel_error(
        error,
        ItemRepositoryError::query,
        ItemRepositoryError::connection,
    )
}

fn map_write(error: diesel::result::Error) -> ItemRepositoryError {
    map_diesel_write_error(
        error,
        ItemRepositoryError::duplicate,
        ItemRepositoryError::query,
        ItemRepositoryError::connection,
    )
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn insert(&self, item: NewItem) -> Result<Item, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::insert_into(items::table)
            .values(NewItemRow {
                name: &item.name,
                description: &item.description,
                available: item.available,
                owner_id: item.owner_id,
                request_id: item.request_id,
            })
            .returning(ItemRow::as_returning())
            .get_result::<ItemRow>(&mut conn)
            .await
            .map(Item::from)
            .map_err(map_write)
    }

    async fn find_by_id(&self, item_id: i64) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        items::table
            .find(item_id)
            .select(ItemRow::as_select())
            .first::<ItemRow>(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Item::from))
            .map_err(map_read)
    }

    async fn update(
        &self,
        item_id: i64,
        patch: ItemPatch,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::update(items::table.find(item_id))
            .set(ItemChangeset::from(patch))
            .returning(ItemRow::as_returning())
            .get_result::<ItemRow>(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Item::from))
            .map_err(map_write)
    }

    async fn delete(&self, item_id: i64) -> Result<bool, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::delete(items::table.find(item_id))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_read)
    }

    async fn find_by_owner_and_name(
        &self,
        owner_id: i64,
        name: &str,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        items::table
            .filter(items::owner_id.eq(owner_id).and(items::name.eq(name)))
            .select(ItemRow::as_select())
            .first::<ItemRow>(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Item::from))
            .map_err(map_read)
    }

    async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        items::table
            .filter(items::owner_id.eq(owner_id))
            .order(items::id.asc())
            .select(ItemRow::as_select())
            .load::<ItemRow>(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(Item::from).collect())
            .map_err(map_read)
    }

    async fn search_available(&self, text: &str) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let pattern = format!("%{text}%");

        items::table
            .filter(items::available.eq(true))
            .filter(
                items::name
                    .ilike(pattern.clone())
                    .or(items::description.ilike(pattern)),
            )
            .order(items::id.asc())
            .select(ItemRow::as_select())
            .load::<ItemRow>(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(Item::from).collect())
            .map_err(map_read)
    }

    async fn list_by_requests(
        &self,
        request_ids: Vec<i64>,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let wanted: Vec<Option<i64>> = request_ids.into_iter().map(Some).collect();

        items::table
            .filter(items::request_id.eq_any(wanted))
            .order(items::id.asc())
            .select(ItemRow::as_select())
            .load::<ItemRow>(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(Item::from).collect())
            .map_err(map_read)
    }
}
