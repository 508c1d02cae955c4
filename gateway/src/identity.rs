//! Extractors for the `X-Sharer-User-Id` identity header.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use serde_json::json;
use std::future::{ready, Ready};

use crate::error::Error;

/// Header identifying the acting user.
pub const USER_ID_HEADER: &str = "X-Sharer-User-Id";

fn parse_header(req: &HttpRequest) -> Result<Option<i64>, Error> {
    let Some(value) = req.headers().get(USER_ID_HEADER) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .map(Some)
        .ok_or_else(|| {
            Error::invalid_request(format!("{USER_ID_HEADER} must be an integer")).with_details(
                json!({
                    "header": USER_ID_HEADER,
                    "code": "malformed_header",
                }),
            )
        })
}

/// Required identity header; rejects the request with 400 when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharerId(pub i64);

impl FromRequest for SharerId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let outcome = parse_header(req).and_then(|value| {
            value.map(SharerId).ok_or_else(|| {
                Error::invalid_request(format!("missing required header: {USER_ID_HEADER}"))
                    .with_details(json!({
                        "header": USER_ID_HEADER,
                        "code": "missing_header",
                    }))
            })
        });
        ready(outcome)
    }
}

/// Optional identity header; absent is fine, malformed is still a 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeSharerId(pub Option<i64>);

impl FromRequest for MaybeSharerId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(parse_header(req).map(MaybeSharerId))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn missing_header_is_rejected_before_forwarding() {
        let app = test::init_service(App::new().route(
            "/",
            web::get().to(|_id: SharerId| async { HttpResponse::Ok().finish() }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn numeric_header_is_accepted() {
        let app = test::init_service(App::new().route(
            "/",
            web::get().to(|id: SharerId| async move {
                HttpResponse::Ok().body(id.0.to_string())
            }),
        ))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/")
                .insert_header((USER_ID_HEADER, "7"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
