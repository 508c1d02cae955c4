//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! the driving service ports and stay testable without a database.

use std::sync::Arc;

use crate::domain::{BookingService, ItemService, RequestService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserService>,
    pub items: Arc<dyn ItemService>,
    pub bookings: Arc<dyn BookingService>,
    pub requests: Arc<dyn RequestService>,
}

impl HttpState {
    pub fn new(
        users: Arc<dyn UserService>,
        items: Arc<dyn ItemService>,
        bookings: Arc<dyn BookingService>,
        requests: Arc<dyn RequestService>,
    ) -> Self {
        Self {
            users,
            items,
            bookings,
            requests,
        }
    }
}
