//! Extractors for the `X-Sharer-User-Id` identity header.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use serde_json::json;

use crate::domain::Error;

/// Header identifying the acting user on item, booking, and request routes.
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
