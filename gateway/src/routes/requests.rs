//! Item request route validation and forwarding.

use std::collections::HashMap;

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use reqwest::Method;
use serde_json::Value;

use crate::error::GatewayResult;
use crate::forward::Forwarder;
use crate::identity::SharerId;
use crate::routes::path_and_query;
use crate::validation::{check_page_bounds, require_non_blank};

#[post("/requests")]
pub async fn create_request(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    requestor: SharerId,
    payload: web::Json<Value>,
) -> GatewayResult<HttpResponse> {
    let body = payload.into_inner();
    require_non_blank(
        body.get("description").and_then(Value::as_str),
        "description",
    )?;

    forwarder
        .forward(
            Method::POST,
            path_and_query(&req),
            Some(requestor.0),
            Some(&body),
        )
        .await
}

#[get("/requests/all")]
pub async fn list_all_requests(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    caller: SharerId,
    query: web::Query<HashMap<String, String>>,
) -> GatewayResult<HttpResponse> {
    check_page_bounds(
        query.get("from").map(String::as_str),
        query.get("size").map(String::as_str),
    )?;

    forwarder
        .forward(Method::GET, path_and_query(&req), Some(caller.0), None)
        .await
}

#[get("/requests")]
pub async fn list_own_requests(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    caller: SharerId,
) -> GatewayResult<HttpResponse> {
    forwarder
        .forward(Method::GET, path_and_query(&req), Some(caller.0), None)
        .await
}

#[get("/requests/{request_id}")]
pub async fn get_request(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    caller: SharerId,
    _path: web::Path<i64>,
) -> GatewayResult<HttpResponse> {
    forwarder
        .forward(Method::GET, path_and_query(&req), Some(caller.0), None)
        .await
}
