//! Item request aggregate.

use chrono::{DateTime, Utc};

use crate::domain::item::Item;

/// A user's expressed need for an item not currently in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequest {
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: DateTime<Utc>,
}

/// Insert payload for an item request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemRequest {
    pub description: String,
    pub requestor_id: i64,
    pub created: DateTime<Utc>,
}

/// A request annotated with the items created in fulfilment of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestWithItems {
    pub request: ItemRequest,
    pub items: Vec<Item>,
}
