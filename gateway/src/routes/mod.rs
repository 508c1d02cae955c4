//! Gateway route handlers, one module per backend resource.

pub mod bookings;
pub mod items;
pub mod requests;
pub mod users;

use actix_web::HttpRequest;

/// The original path and query, forwarded verbatim to the backend.
pub(crate) fn path_and_query(req: &HttpRequest) -> &str {
    req.uri()
        .path_and_query()
        .map_or_else(|| req.uri().path(), |pq| pq.as_str())
}
