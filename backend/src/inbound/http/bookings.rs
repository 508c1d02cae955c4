//! Booking API handlers.
//!
//! ```text
//! POST  /bookings
//! PATCH /bookings/{booking_id}?approved=
//! GET   /bookings/{booking_id}
//! GET   /bookings?state=&from=&size=
//! GET   /bookings/owner?state=&from=&size=
//! ```

use actix_web::{get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::booking::{BookingStatus, BookingView, ItemRef, UserRef};
use crate::domain::Error;
use crate::inbound::http::identity::SharerId;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_bool_param, parse_page, parse_rfc3339_timestamp, parse_state, FieldName,
};
use crate::inbound::http::ApiResult;

/// Request payload for creating a booking.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingBody {
    pub item_id: Option<i64>,
    #[schema(format = "date-time")]
    pub start: Option<String>,
    #[schema(format = "date-time")]
    pub end: Option<String>,
}

/// Short item view embedded in booking responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemRefBody {
    pub id: i64,
    pub name: String,
}

/// Short user view embedded in booking responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserRefBody {
    pub id: i64,
    pub name: String,
}

/// Booking representation returned by every booking endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponseBody {
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub item: ItemRefBody,
    pub booker: UserRefBody,
}

impl From<ItemRef> for ItemRefBody {
    fn from(item: ItemRef) -> Self {
        Self {
            id: item.id,
            name: item.name,
        }
    }
}

impl From<UserRef> for UserRefBody {
    fn from(user: UserRef) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

impl From<BookingView> for BookingResponseBody {
    fn from(view: BookingView) -> Self {
        Self {
            id: view.id,
            start: view.start,
            end: view.end,
            status: view.status,
            item: ItemRefBody::from(view.item),
            booker: UserRefBody::from(view.booker),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApprovedQuery {
    approved: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    state: Option<String>,
    from: Option<String>,
    size: Option<String>,
}

/// Book an item for a time range.
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = BookingBody,
    responses(
        (status = 200, description = "Booking created in WAITING state", body = BookingResponseBody),
        (status = 400, description = "Invalid dates or unavailable item", body = Error),
        (status = 403, description = "Owner booking own item", body = Error),
        (status = 404, description = "No such user or item", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    booker: SharerId,
    payload: web::Json<BookingBody>,
) -> ApiResult<web::Json<BookingResponseBody>> {
    let body = payload.into_inner();
    let item_id = body
        .item_id
        .ok_or_else(|| Error::invalid_request("missing required field: itemId"))?;
    let start = parse_rfc3339_timestamp(body.start, FieldName::new("start"))?;
    let end = parse_rfc3339_timestamp(body.end, FieldName::new("end"))?;

    let view = state.bookings.create(booker.0, item_id, start, end).await?;
    Ok(web::Json(BookingResponseBody::from(view)))
}

/// List bookings of items owned by the caller.
#[utoipa::path(
    get,
    path = "/bookings/owner",
    responses(
        (status = 200, description = "Bookings of owned items", body = [BookingResponseBody]),
        (status = 400, description = "Unknown state or bad pagination", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "listOwnerBookings"
)]
#[get("/bookings/owner")]
pub async fn list_owner_bookings(
    state: web::Data<HttpState>,
    owner: SharerId,
    query: web::Query<BookingListQuery>,
) -> ApiResult<web::Json<Vec<BookingResponseBody>>> {
    let query = query.into_inner();
    let filter = parse_state(query.state)?;
    let page = parse_page(query.from, query.size)?;

    let views = state.bookings.list_for_owner(owner.0, filter, page).await?;
    Ok(web::Json(
        views.into_iter().map(BookingResponseBody::from).collect(),
    ))
}

/// Approve or reject a booking; item owner only.
#[utoipa::path(
    patch,
    path = "/bookings/{booking_id}",
    responses(
        (status = 200, description = "Booking resolved", body = BookingResponseBody),
        (status = 400, description = "Already resolved or bad approved flag", body = Error),
        (status = 403, description = "Caller does not own the item", body = Error),
        (status = 404, description = "No such booking", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "updateBookingStatus"
)]
#[patch("/bookings/{booking_id}")]
pub async fn update_booking_status(
    state: web::Data<HttpState>,
    owner: SharerId,
    path: web::Path<i64>,
    query: web::Query<ApprovedQuery>,
) -> ApiResult<web::Json<BookingResponseBody>> {
    let approved = parse_bool_param(query.into_inner().approved, FieldName::new("approved"))?;

    let view = state
        .bookings
        .update_status(owner.0, path.into_inner(), approved)
        .await?;
    Ok(web::Json(BookingResponseBody::from(view)))
}

/// Fetch one booking; booker and item owner only.
#[utoipa::path(
    get,
    path = "/bookings/{booking_id}",
    responses(
        (status = 200, description = "Booking", body = BookingResponseBody),
        (status = 403, description = "Caller is neither booker nor owner", body = Error),
        (status = 404, description = "No such booking", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "getBooking"
)]
#[get("/bookings/{booking_id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    caller: SharerId,
    path: web::Path<i64>,
) -> ApiResult<web::Json<BookingResponseBody>> {
    let view = state.bookings.get(caller.0, path.into_inner()).await?;
    Ok(web::Json(BookingResponseBody::from(view)))
}

/// List bookings placed by the caller.
#[utoipa::path(
    get,
    path = "/bookings",
    responses(
        (status = 200, description = "Bookings placed by the caller", body = [BookingResponseBody]),
        (status = 400, description = "Unknown state or bad pagination", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "listBookings"
)]
#[get("/bookings")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    booker: SharerId,
    query: web::Query<BookingListQuery>,
) -> ApiResult<web::Json<Vec<BookingResponseBody>>> {
    let query = query.into_inner();
    let filter = parse_state(query.state)?;
    let page = parse_page(query.from, query.size)?;

    let views = state
        .bookings
        .list_for_booker(booker.0, filter, page)
        .await?;
    Ok(web::Json(
        views.into_iter().map(BookingResponseBody::from).collect(),
    ))
}
