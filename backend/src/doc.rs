//! OpenAPI surface served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::booking::BookingStatus;
use crate::domain::error::{Error, ErrorCode};
use crate::inbound::http::bookings::{
    BookingBody, BookingResponseBody, ItemRefBody, UserRefBody,
};
use crate::inbound::http::items::{
    BookingBriefBody, CommentBody, CommentResponseBody, ItemBody, ItemDetailsBody,
    ItemResponseBody,
};
use crate::inbound::http::requests::{RequestBody, RequestItemBody, RequestResponseBody};
use crate::inbound::http::users::{UserBody, UserResponseBody};

/// Aggregated OpenAPI document for the REST surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::items::create_item,
        crate::inbound::http::items::search_items,
        crate::inbound::http::items::get_item,
        crate::inbound::http::items::list_items,
        crate::inbound::http::items::update_item,
        crate::inbound::http::items::delete_item,
        crate::inbound::http::items::add_comment,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::list_owner_bookings,
        crate::inbound::http::bookings::update_booking_status,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::bookings::list_bookings,
        crate::inbound::http::requests::create_request,
        crate::inbound::http::requests::list_all_requests,
        crate::inbound::http::requests::list_own_requests,
        crate::inbound::http::requests::get_request,
    ),
    components(schemas(
        Error,
        ErrorCode,
        BookingStatus,
        UserBody,
        UserResponseBody,
        ItemBody,
        ItemResponseBody,
        ItemDetailsBody,
        BookingBriefBody,
        CommentBody,
        CommentResponseBody,
        BookingBody,
        BookingResponseBody,
        ItemRefBody,
        UserRefBody,
        RequestBody,
        RequestItemBody,
        RequestResponseBody,
    )),
    tags(
        (name = "users", description = "User accounts"),
        (name = "items", description = "Shareable items and comments"),
        (name = "bookings", description = "Item reservations"),
        (name = "requests", description = "Requests for missing items"),
    )
)]
pub struct ApiDoc;
