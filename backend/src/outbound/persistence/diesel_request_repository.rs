//! PostgreSQL-backed [`RequestRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::page::Page;
use crate::domain::ports::{RequestRepository, RequestRepositoryError};
use crate::domain::request::{ItemRequest, NewItemRequest};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewRequestRow, RequestRow};
use super::pool::{DbPool, PoolError};
use super::schema::item_requests;

/// Diesel-backed implementation of the item request repository port.
#[derive(Clone)]
pub struct DieselRequestRepository {
    pool: DbPool,
}

impl DieselRequestRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> RequestRepositoryError {
    map_pool_error(error, RequestRepositoryError::connection)
}

fn map_read(error: diesel::result::Error) -> RequestRepositoryError {
    map_diesel_error(
        error,
        RequestRepositoryError::query,
        RequestRepositoryError::connection,
    )
}

#[async_trait]
impl RequestRepository for DieselRequestRepository {
    async fn insert(
        &self,
        request: NewItemRequest,
    ) -> Result<ItemRequest, RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::insert_into(item_requests::table)
            .values(NewRequestRow {
                description: &request.description,
                requestor_id: request.requestor_id,
                created: request.created,
            })
            .returning(RequestRow::as_returning())
            .get_result::<RequestRow>(&mut conn)
            .await
            .map(ItemRequest::from)
            .map_err(map_read)
    }

    async fn find_by_id(
        &self,
        request_id: i64,
    ) -> Result<Option<ItemRequest>, RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        item_requests::table
            .find(request_id)
            .select(RequestRow::as_select())
            .first::<RequestRow>(&mut conn)
            .await
            .optional()
            .map(|row| row.map(ItemRequest::from))
            .map_err(map_read)
    }

    async fn list_for_requestor(
        &self,
        requestor_id: i64,
    ) -> Result<Vec<ItemRequest>, RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        item_requests::table
            .filter(item_requests::requestor_id.eq(requestor_id))
            .order(item_requests::created.desc())
            .select(RequestRow::as_select())
            .load::<RequestRow>(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(ItemRequest::from).collect())
            .map_err(map_read)
    }

    async fn list_excluding_requestor(
        &self,
        requestor_id: i64,
        page: Page,
    ) -> Result<Vec<ItemRequest>, RequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        item_requests::table
            .filter(item_requests::requestor_id.ne(requestor_id))
            .order(item_requests::created.desc())
            .offset(page.offset())
            .limit(page.limit())
            .select(RequestRow::as_select())
            .load::<RequestRow>(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(ItemRequest::from).collect())
            .map_err(map_read)
    }
}
