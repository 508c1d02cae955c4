//! Port for booking persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::booking::{
    Booking, BookingPredicate, BookingRecord, BookingScope, BookingStatus, NewBooking,
};
use crate::domain::page::Page;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "booking repository query failed: {message}",
    }
}

/// Storage and retrieval of bookings.
///
/// List queries join the referenced item and booker so response assembly
/// needs no follow-up reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking and return it with its assigned id.
    async fn insert(&self, booking: NewBooking) -> Result<Booking, BookingRepositoryError>;

    async fn find_record(
        &self,
        booking_id: i64,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError>;

    /// Atomically resolve a WAITING booking to `status`.
    ///
    /// Implemented as a single conditional update (`… WHERE status =
    /// 'WAITING'`), so of two racing callers exactly one observes the
    /// transition; the loser gets `None`, the same answer as for a booking
    /// resolved long ago.
    async fn update_status_if_waiting(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Bookings in `scope` matching `predicate`, ordered by start descending.
    async fn list(
        &self,
        scope: BookingScope,
        predicate: BookingPredicate,
        page: Page,
    ) -> Result<Vec<BookingRecord>, BookingRepositoryError>;

    /// The latest approved booking of the item that has already ended.
    async fn last_approved_for_item(
        &self,
        item_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// The earliest approved booking of the item still ahead of `now`.
    async fn next_approved_for_item(
        &self,
        item_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// True when the booker holds at least one approved booking of the item
    /// that ended before `now`; gates comment creation.
    async fn has_completed_for_booker(
        &self,
        item_id: i64,
        booker_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, BookingRepositoryError>;
}
