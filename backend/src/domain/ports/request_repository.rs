//! Port for item request persistence.

use async_trait::async_trait;

use crate::domain::page::Page;
use crate::domain::request::{ItemRequest, NewItemRequest};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by item request repository adapters.
    pub enum RequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "request repository query failed: {message}",
    }
}

/// Storage and retrieval of item requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Persist a new request and return it with its assigned id.
    async fn insert(&self, request: NewItemRequest)
        -> Result<ItemRequest, RequestRepositoryError>;

    async fn find_by_id(
        &self,
        request_id: i64,
    ) -> Result<Option<ItemRequest>, RequestRepositoryError>;

    /// Requests authored by this user, newest first.
    async fn list_for_requestor(
        &self,
        requestor_id: i64,
    ) -> Result<Vec<ItemRequest>, RequestRepositoryError>;

    /// Requests authored by anyone else, newest first, paginated.
    async fn list_excluding_requestor(
        &self,
        requestor_id: i64,
        page: Page,
    ) -> Result<Vec<ItemRequest>, RequestRepositoryError>;
}
