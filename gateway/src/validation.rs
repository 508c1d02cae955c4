//! Request-shape validation applied before anything is forwarded.
//!
//! The gateway owns the cheap checks (field presence, value shapes, parameter
//! bounds); domain rules such as ownership and uniqueness stay with the
//! backend.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::error::Error;

/// Booking list filter states accepted by the backend.
const BOOKING_STATES: [&str; 6] = ["ALL", "CURRENT", "PAST", "FUTURE", "WAITING", "REJECTED"];

pub(crate) fn require_non_blank(value: Option<&str>, field: &str) -> Result<(), Error> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(
            Error::invalid_request(format!("{field} must not be blank")).with_details(json!({
                "field": field,
                "code": "blank_field",
            })),
        ),
    }
}

pub(crate) fn check_non_blank_if_present(value: Option<&str>, field: &str) -> Result<(), Error> {
    match value {
        None => Ok(()),
        some => require_non_blank(some, field),
    }
}

pub(crate) fn require_email(value: Option<&str>) -> Result<(), Error> {
    require_non_blank(value, "email")?;
    match value {
        Some(email) if email.contains('@') => Ok(()),
        _ => Err(Error::invalid_request("email is malformed").with_details(json!({
            "field": "email",
            "code": "malformed_email",
        }))),
    }
}

pub(crate) fn require_timestamp(
    value: Option<&str>,
    field: &str,
) -> Result<DateTime<Utc>, Error> {
    let raw = value.ok_or_else(|| {
        Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
            "field": field,
            "code": "missing_field",
        }))
    })?;
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            Error::invalid_request(format!("{field} must be an RFC 3339 timestamp")).with_details(
                json!({
                    "field": field,
                    "value": raw,
                    "code": "invalid_timestamp",
                }),
            )
        })
}

/// Booking ranges must have strictly positive duration.
pub(crate) fn check_booking_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(), Error> {
    let start = require_timestamp(start, "start")?;
    let end = require_timestamp(end, "end")?;
    if start >= end {
        return Err(
            Error::invalid_request("booking dates are invalid").with_details(json!({
                "field": "start",
                "code": "invalid_range",
            })),
        );
    }
    Ok(())
}

pub(crate) fn check_state(value: Option<&str>) -> Result<(), Error> {
    match value {
        None => Ok(()),
        Some(state) if BOOKING_STATES.contains(&state) => Ok(()),
        Some(state) => Err(
            Error::invalid_request(format!("Unknown state: {state}")).with_details(json!({
                "field": "state",
                "value": state,
                "code": "unknown_state",
            })),
        ),
    }
}

fn check_integer_bound(
    value: Option<&str>,
    field: &str,
    accepts: impl Fn(i64) -> bool,
) -> Result<(), Error> {
    let Some(raw) = value else {
        return Ok(());
    };
    let parsed: i64 = raw.trim().parse().map_err(|_| {
        Error::invalid_request(format!("{field} must be an integer")).with_details(json!({
            "field": field,
            "value": raw,
            "code": "invalid_integer",
        }))
    })?;
    if accepts(parsed) {
        Ok(())
    } else {
        Err(
            Error::invalid_request(format!("{field} is out of range")).with_details(json!({
                "field": field,
                "value": raw,
                "code": "out_of_range",
            })),
        )
    }
}

/// `from` must be non-negative and `size` strictly positive when present.
pub(crate) fn check_page_bounds(
    from: Option<&str>,
    size: Option<&str>,
) -> Result<(), Error> {
    check_integer_bound(from, "from", |from| from >= 0)?;
    check_integer_bound(size, "size", |size| size > 0)
}

/// `approved` is required and must be a boolean literal.
pub(crate) fn check_approved(value: Option<&str>) -> Result<(), Error> {
    let raw = value.ok_or_else(|| {
        Error::invalid_request("missing required parameter: approved").with_details(json!({
            "field": "approved",
            "code": "missing_parameter",
        }))
    })?;
    raw.trim().parse::<bool>().map(|_| ()).map_err(|_| {
        Error::invalid_request("approved must be true or false").with_details(json!({
            "field": "approved",
            "value": raw,
            "code": "invalid_boolean",
        }))
    })
}
