//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::booking::BookingStateFilter;
use crate::domain::page::{Page, DEFAULT_PAGE_SIZE};
use crate::domain::Error;

/// Newtype wrapper for wire-level field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

pub(crate) fn parse_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    let raw = value.ok_or_else(|| missing_field_error(field))?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            let field = field.as_str();
            Error::invalid_request(format!("{field} must be an RFC 3339 timestamp")).with_details(
                json!({
                    "field": field,
                    "value": raw,
                    "code": "invalid_timestamp",
                }),
            )
        })
}

fn parse_i64_param(value: Option<String>, field: FieldName) -> Result<Option<i64>, Error> {
    value
        .map(|raw| {
            raw.trim().parse::<i64>().map_err(|_| {
                let field = field.as_str();
                Error::invalid_request(format!("{field} must be an integer")).with_details(json!({
                    "field": field,
                    "value": raw,
                    "code": "invalid_integer",
                }))
            })
        })
        .transpose()
}

/// Parse the `from`/`size` query parameters, applying the wire defaults.
pub(crate) fn parse_page(from: Option<String>, size: Option<String>) -> Result<Page, Error> {
    let from = parse_i64_param(from, FieldName::new("from"))?.unwrap_or(0);
    let size = parse_i64_param(size, FieldName::new("size"))?.unwrap_or(DEFAULT_PAGE_SIZE);
    Page::new(from, size)
}

/// Parse the booking `state` query parameter, defaulting to `ALL`.
pub(crate) fn parse_state(raw: Option<String>) -> Result<BookingStateFilter, Error> {
    match raw {
        None => Ok(BookingStateFilter::All),
        Some(raw) => raw.parse::<BookingStateFilter>().map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "state",
                "value": err.0,
                "code": "unknown_state",
            }))
        }),
    }
}

/// Parse a required boolean query parameter (`true`/`false`).
pub(crate) fn parse_bool_param(value: Option<String>, field: FieldName) -> Result<bool, Error> {
    let raw = value.ok_or_else(|| {
        let field = field.as_str();
        Error::invalid_request(format!("missing required parameter: {field}")).with_details(
            json!({
                "field": field,
                "code": "missing_parameter",
            }),
        )
    })?;
    raw.trim().parse::<bool>().map_err(|_| {
        let field = field.as_str();
        Error::invalid_request(format!("{field} must be true or false")).with_details(json!({
            "field": field,
            "value": raw,
            "code": "invalid_boolean",
        }))
    })
}
