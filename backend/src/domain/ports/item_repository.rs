//! Port for item persistence.

use async_trait::async_trait;

use crate::domain::item::{Item, ItemPatch, NewItem};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by item repository adapters.
    pub enum ItemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "item repository query failed: {message}",
        /// The (owner, name) unique index rejected the write.
        Duplicate { message: String } =>
            "item already exists: {message}",
    }
}

/// Storage and retrieval of items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Persist a new item and return it with its assigned id.
    async fn insert(&self, item: NewItem) -> Result<Item, ItemRepositoryError>;

    async fn find_by_id(&self, item_id: i64) -> Result<Option<Item>, ItemRepositoryError>;

    /// Apply a partial update; `None` fields are left untouched. Returns the
    /// updated item, or `None` when no such item exists. Callers must not
    /// pass an empty patch.
    async fn update(&self, item_id: i64, patch: ItemPatch)
        -> Result<Option<Item>, ItemRepositoryError>;

    /// Returns true when a row was deleted.
    async fn delete(&self, item_id: i64) -> Result<bool, ItemRepositoryError>;

    /// Exact-name lookup scoped to one owner, backing the duplicate check.
    async fn find_by_owner_and_name(
        &self,
        owner_id: i64,
        name: &str,
    ) -> Result<Option<Item>, ItemRepositoryError>;

    /// All items of one owner, ordered by id ascending.
    async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<Item>, ItemRepositoryError>;

    /// Available items whose name or description contains `text`
    /// (case-insensitive). The caller filters out blank queries.
    async fn search_available(&self, text: &str) -> Result<Vec<Item>, ItemRepositoryError>;

    /// Items created in fulfilment of any of the given requests.
    async fn list_by_requests(
        &self,
        request_ids: Vec<i64>,
    ) -> Result<Vec<Item>, ItemRepositoryError>;
}
