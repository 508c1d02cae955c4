//! Booking route validation and forwarding.

use std::collections::HashMap;

use actix_web::{get, patch, post, web, HttpRequest, HttpResponse};
use reqwest::Method;
use serde_json::{json, Value};

use crate::error::{Error, GatewayResult};
use crate::forward::Forwarder;
use crate::identity::SharerId;
use crate::routes::path_and_query;
use crate::validation::{check_approved, check_booking_range, check_page_bounds, check_state};

fn check_list_query(query: &HashMap<String, String>) -> Result<(), Error> {
    check_state(query.get("state").map(String::as_str))?;
    check_page_bounds(
        query.get("from").map(String::as_str),
        query.get("size").map(String::as_str),
    )
}

#[post("/bookings")]
pub async fn create_booking(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    booker: SharerId,
    payload: web::Json<Value>,
) -> GatewayResult<HttpResponse> {
    let body = payload.into_inner();
    if body.get("itemId").and_then(Value::as_i64).is_none() {
        return Err(
            Error::invalid_request("missing required field: itemId").with_details(json!({
                "field": "itemId",
                "code": "missing_field",
            })),
        );
    }
    check_booking_range(
        body.get("start").and_then(Value::as_str),
        body.get("end").and_then(Value::as_str),
    )?;

    forwarder
        .forward(
            Method::POST,
            path_and_query(&req),
            Some(booker.0),
            Some(&body),
        )
        .await
}

#[get("/bookings/owner")]
pub async fn list_owner_bookings(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    owner: SharerId,
    query: web::Query<HashMap<String, String>>,
) -> GatewayResult<HttpResponse> {
    check_list_query(&query)?;

    forwarder
        .forward(Method::GET, path_and_query(&req), Some(owner.0), None)
        .await
}

#[get("/bookings")]
pub async fn list_bookings(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    booker: SharerId,
    query: web::Query<HashMap<String, String>>,
) -> GatewayResult<HttpResponse> {
    check_list_query(&query)?;

    forwarder
        .forward(Method::GET, path_and_query(&req), Some(booker.0), None)
        .await
}

#[get("/bookings/{booking_id}")]
pub async fn get_booking(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    caller: SharerId,
    _path: web::Path<i64>,
) -> GatewayResult<HttpResponse> {
    forwarder
        .forward(Method::GET, path_and_query(&req), Some(caller.0), None)
        .await
}

#[patch("/bookings/{booking_id}")]
pub async fn update_booking_status(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    owner: SharerId,
    _path: web::Path<i64>,
    query: web::Query<HashMap<String, String>>,
) -> GatewayResult<HttpResponse> {
    check_approved(query.get("approved").map(String::as_str))?;

    forwarder
        .forward(Method::PATCH, path_and_query(&req), Some(owner.0), None)
        .await
}
