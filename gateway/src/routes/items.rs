//! Item route validation and forwarding.

use std::collections::HashMap;

use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use reqwest::Method;
use serde_json::{json, Value};

use crate::error::{Error, GatewayResult};
use crate::forward::Forwarder;
use crate::identity::{MaybeSharerId, SharerId};
use crate::routes::path_and_query;
use crate::validation::{check_non_blank_if_present, check_page_bounds, require_non_blank};

fn field<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    body.get(name).and_then(Value::as_str)
}

#[post("/items")]
pub async fn create_item(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    owner: SharerId,
    payload: web::Json<Value>,
) -> GatewayResult<HttpResponse> {
    let body = payload.into_inner();
    require_non_blank(field(&body, "name"), "name")?;
    require_non_blank(field(&body, "description"), "description")?;
    if body.get("available").and_then(Value::as_bool).is_none() {
        return Err(
            Error::invalid_request("available must be set").with_details(json!({
                "field": "available",
                "code": "missing_field",
            })),
        );
    }

    forwarder
        .forward(Method::POST, path_and_query(&req), Some(owner.0), Some(&body))
        .await
}

#[get("/items/search")]
pub async fn search_items(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> GatewayResult<HttpResponse> {
    if !query.contains_key("text") {
        return Err(Error::invalid_request("missing required parameter: text"));
    }
    check_page_bounds(
        query.get("from").map(String::as_str),
        query.get("size").map(String::as_str),
    )?;

    forwarder
        .forward(Method::GET, path_and_query(&req), None, None)
        .await
}

#[get("/items")]
pub async fn list_items(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    owner: SharerId,
) -> GatewayResult<HttpResponse> {
    forwarder
        .forward(Method::GET, path_and_query(&req), Some(owner.0), None)
        .await
}

#[get("/items/{item_id}")]
pub async fn get_item(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    requester: MaybeSharerId,
    _path: web::Path<i64>,
) -> GatewayResult<HttpResponse> {
    forwarder
        .forward(Method::GET, path_and_query(&req), requester.0, None)
        .await
}

#[patch("/items/{item_id}")]
pub async fn update_item(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    owner: SharerId,
    _path: web::Path<i64>,
    payload: web::Json<Value>,
) -> GatewayResult<HttpResponse> {
    let body = payload.into_inner();
    check_non_blank_if_present(field(&body, "name"), "name")?;
    check_non_blank_if_present(field(&body, "description"), "description")?;

    forwarder
        .forward(
            Method::PATCH,
            path_and_query(&req),
            Some(owner.0),
            Some(&body),
        )
        .await
}

#[delete("/items/{item_id}")]
pub async fn delete_item(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    owner: SharerId,
    _path: web::Path<i64>,
) -> GatewayResult<HttpResponse> {
    forwarder
        .forward(Method::DELETE, path_and_query(&req), Some(owner.0), None)
        .await
}

#[post("/items/{item_id}/comment")]
pub async fn add_comment(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    author: SharerId,
    _path: web::Path<i64>,
    payload: web::Json<Value>,
) -> GatewayResult<HttpResponse> {
    let body = payload.into_inner();
    require_non_blank(field(&body, "text"), "text")?;

    forwarder
        .forward(
            Method::POST,
            path_and_query(&req),
            Some(author.0),
            Some(&body),
        )
        .await
}
