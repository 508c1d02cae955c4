//! Item API handlers.
//!
//! ```text
//! POST   /items
//! GET    /items
//! GET    /items/search?text=
//! GET    /items/{item_id}
//! PATCH  /items/{item_id}
//! DELETE /items/{item_id}
//! POST   /items/{item_id}/comment
//! ```

use actix_web::{delete, get, patch, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::item::{
    BookingBrief, CommentRecord, Item, ItemDraft, ItemPatch, ItemWithActivity,
};
use crate::domain::Error;
use crate::inbound::http::identity::{MaybeSharerId, SharerId};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for creating or patching an item.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
    pub request_id: Option<i64>,
}

/// Item representation without booking details.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponseBody {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i64>,
}

impl From<Item> for ItemResponseBody {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id,
        }
    }
}

/// Short booking view embedded in owner-facing item responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingBriefBody {
    pub id: i64,
    pub booker_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<BookingBrief> for BookingBriefBody {
    fn from(brief: BookingBrief) -> Self {
        Self {
            id: brief.id,
            booker_id: brief.booker_id,
            start: brief.start,
            end: brief.end,
        }
    }
}

/// Comment representation returned by item endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponseBody {
    pub id: i64,
    pub text: String,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

impl From<CommentRecord> for CommentResponseBody {
    fn from(record: CommentRecord) -> Self {
        Self {
            id: record.comment.id,
            text: record.comment.text,
            author_name: record.author_name,
            created: record.comment.created,
        }
    }
}

/// Item augmented with comments and, for the owner, last/next bookings.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailsBody {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i64>,
    pub last_booking: Option<BookingBriefBody>,
    pub next_booking: Option<BookingBriefBody>,
    pub comments: Vec<CommentResponseBody>,
}

impl From<ItemWithActivity> for ItemDetailsBody {
    fn from(view: ItemWithActivity) -> Self {
        Self {
            id: view.item.id,
            name: view.item.name,
            description: view.item.description,
            available: view.item.available,
            request_id: view.item.request_id,
            last_booking: view.last_booking.map(BookingBriefBody::from),
            next_booking: view.next_booking.map(BookingBriefBody::from),
            comments: view
                .comments
                .into_iter()
                .map(CommentResponseBody::from)
                .collect(),
        }
    }
}

/// Request payload for leaving a comment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CommentBody {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    text: Option<String>,
    // Accepted for forward compatibility with the gateway surface; the
    // search itself is unpaginated.
    #[serde(rename = "from")]
    _from: Option<String>,
    #[serde(rename = "size")]
    _size: Option<String>,
}

/// List a new item.
#[utoipa::path(
    post,
    path = "/items",
    request_body = ItemBody,
    responses(
        (status = 200, description = "Item created", body = ItemResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Owner or linked request missing", body = Error),
        (status = 409, description = "Duplicate item name for this owner", body = Error)
    ),
    tags = ["items"],
    operation_id = "createItem"
)]
#[post("/items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    owner: SharerId,
    payload: web::Json<ItemBody>,
) -> ApiResult<web::Json<ItemResponseBody>> {
    let body = payload.into_inner();
    let item = state
        .items
        .create(
            owner.0,
            ItemDraft {
                name: body.name,
                description: body.description,
                available: body.available,
                request_id: body.request_id,
            },
        )
        .await?;
    Ok(web::Json(ItemResponseBody::from(item)))
}

/// Search available items by name or description.
#[utoipa::path(
    get,
    path = "/items/search",
    responses(
        (status = 200, description = "Matching items", body = [ItemResponseBody]),
        (status = 400, description = "Missing text parameter", body = Error)
    ),
    tags = ["items"],
    operation_id = "searchItems"
)]
#[get("/items/search")]
pub async fn search_items(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<ItemResponseBody>>> {
    let text = query
        .into_inner()
        .text
        .ok_or_else(|| Error::invalid_request("missing required parameter: text"))?;
    let items = state.items.search(text).await?;
    Ok(web::Json(
        items.into_iter().map(ItemResponseBody::from).collect(),
    ))
}

/// Fetch one item; the owner additionally sees last/next bookings.
#[utoipa::path(
    get,
    path = "/items/{item_id}",
    responses(
        (status = 200, description = "Item", body = ItemDetailsBody),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["items"],
    operation_id = "getItem"
)]
#[get("/items/{item_id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    requester: MaybeSharerId,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ItemDetailsBody>> {
    let view = state
        .items
        .get_with_activity(path.into_inner(), requester.0)
        .await?;
    Ok(web::Json(ItemDetailsBody::from(view)))
}

/// List the caller's items with bookings and comments.
#[utoipa::path(
    get,
    path = "/items",
    responses(
        (status = 200, description = "Owned items", body = [ItemDetailsBody]),
        (status = 400, description = "Missing identity header", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["items"],
    operation_id = "listItems"
)]
#[get("/items")]
pub async fn list_items(
    state: web::Data<HttpState>,
    owner: SharerId,
) -> ApiResult<web::Json<Vec<ItemDetailsBody>>> {
    let views = state.items.list_for_owner(owner.0).await?;
    Ok(web::Json(
        views.into_iter().map(ItemDetailsBody::from).collect(),
    ))
}

/// Partially update an item; owner only.
#[utoipa::path(
    patch,
    path = "/items/{item_id}",
    request_body = ItemBody,
    responses(
        (status = 200, description = "Updated item", body = ItemResponseBody),
        (status = 403, description = "Caller does not own the item", body = Error),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["items"],
    operation_id = "updateItem"
)]
#[patch("/items/{item_id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    owner: SharerId,
    path: web::Path<i64>,
    payload: web::Json<ItemBody>,
) -> ApiResult<web::Json<ItemResponseBody>> {
    let body = payload.into_inner();
    let item = state
        .items
        .update(
            owner.0,
            path.into_inner(),
            ItemPatch {
                name: body.name,
                description: body.description,
                available: body.available,
            },
        )
        .await?;
    Ok(web::Json(ItemResponseBody::from(item)))
}

/// Delete an item; owner only.
#[utoipa::path(
    delete,
    path = "/items/{item_id}",
    responses(
        (status = 200, description = "Item deleted"),
        (status = 403, description = "Caller does not own the item", body = Error),
        (status = 404, description = "No such item", body = Error)
    ),
    tags = ["items"],
    operation_id = "deleteItem"
)]
#[delete("/items/{item_id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    owner: SharerId,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.items.delete(owner.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Comment on an item after a completed booking.
#[utoipa::path(
    post,
    path = "/items/{item_id}/comment",
    request_body = CommentBody,
    responses(
        (status = 200, description = "Comment created", body = CommentResponseBody),
        (status = 400, description = "No completed booking or blank text", body = Error),
        (status = 404, description = "No such item or user", body = Error)
    ),
    tags = ["items"],
    operation_id = "addComment"
)]
#[post("/items/{item_id}/comment")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    author: SharerId,
    path: web::Path<i64>,
    payload: web::Json<CommentBody>,
) -> ApiResult<web::Json<CommentResponseBody>> {
    let record = state
        .items
        .add_comment(author.0, path.into_inner(), payload.into_inner().text)
        .await?;
    Ok(web::Json(CommentResponseBody::from(record)))
}
