//! Diesel row types and changesets, plus conversions into domain entities.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::item::{Comment, Item, ItemPatch};
use crate::domain::request::ItemRequest;
use crate::domain::user::{User, UserPatch};

use super::schema::{bookings, comments, item_requests, items, users};

/// Queryable row for users.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

/// Insertable row for users.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

/// Changeset for partial user updates; `None` fields are untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<UserPatch> for UserChangeset {
    fn from(patch: UserPatch) -> Self {
        Self {
            name: patch.name,
            email: patch.email,
        }
    }
}

/// Queryable row for items.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            available: row.available,
            owner_id: row.owner_id,
            request_id: row.request_id,
        }
    }
}

/// Insertable row for items.
#[derive(Debug, Insertable)]
#[diesel(table_name = items)]
pub(crate) struct NewItemRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

/// Changeset for partial item updates; `None` fields are untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = items)]
pub(crate) struct ItemChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl From<ItemPatch> for ItemChangeset {
    fn from(patch: ItemPatch) -> Self {
        Self {
            name: patch.name,
            description: patch.description,
            available: patch.available,
        }
    }
}

/// Queryable row for bookings. The status string is parsed into
/// [`crate::domain::booking::BookingStatus`] by the repository.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: String,
}

/// Insertable row for bookings.
#[derive(Debug, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: &'a str,
}

/// Queryable row for item requests.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = item_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RequestRow {
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: DateTime<Utc>,
}

impl From<RequestRow> for ItemRequest {
    fn from(row: RequestRow) -> Self {
        Self {
            id: row.id,
            description: row.description,
            requestor_id: row.requestor_id,
            created: row.created,
        }
    }
}

/// Insertable row for item requests.
#[derive(Debug, Insertable)]
#[diesel(table_name = item_requests)]
pub(crate) struct NewRequestRow<'a> {
    pub description: &'a str,
    pub requestor_id: i64,
    pub created: DateTime<Utc>,
}

/// Queryable row for comments.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    pub created: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            item_id: row.item_id,
            author_id: row.author_id,
            created: row.created,
        }
    }
}

/// Insertable row for comments.
#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub text: &'a str,
    pub item_id: i64,
    pub author_id: i64,
    pub created: DateTime<Utc>,
}
