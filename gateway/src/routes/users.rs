//! User route validation and forwarding.

use actix_web::{delete, get, patch, post, web, HttpRequest, HttpResponse};
use reqwest::Method;
use serde_json::Value;

use crate::error::GatewayResult;
use crate::forward::Forwarder;
use crate::routes::path_and_query;
use crate::validation::{check_non_blank_if_present, require_email, require_non_blank};

fn field<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    body.get(name).and_then(Value::as_str)
}

#[post("/users")]
pub async fn create_user(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    payload: web::Json<Value>,
) -> GatewayResult<HttpResponse> {
    let body = payload.into_inner();
    require_non_blank(field(&body, "name"), "name")?;
    require_email(field(&body, "email"))?;

    forwarder
        .forward(Method::POST, path_and_query(&req), None, Some(&body))
        .await
}

#[get("/users")]
pub async fn list_users(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
) -> GatewayResult<HttpResponse> {
    forwarder
        .forward(Method::GET, path_and_query(&req), None, None)
        .await
}

#[get("/users/{user_id}")]
pub async fn get_user(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    _path: web::Path<i64>,
) -> GatewayResult<HttpResponse> {
    forwarder
        .forward(Method::GET, path_and_query(&req), None, None)
        .await
}

#[patch("/users/{user_id}")]
pub async fn update_user(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    _path: web::Path<i64>,
    payload: web::Json<Value>,
) -> GatewayResult<HttpResponse> {
    let body = payload.into_inner();
    check_non_blank_if_present(field(&body, "name"), "name")?;
    if body.get("email").is_some() {
        require_email(field(&body, "email"))?;
    }

    forwarder
        .forward(Method::PATCH, path_and_query(&req), None, Some(&body))
        .await
}

#[delete("/users/{user_id}")]
pub async fn delete_user(
    forwarder: web::Data<Forwarder>,
    req: HttpRequest,
    _path: web::Path<i64>,
) -> GatewayResult<HttpResponse> {
    forwarder
        .forward(Method::DELETE, path_and_query(&req), None, None)
        .await
}
