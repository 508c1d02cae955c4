//! Booking aggregate: status lifecycle and list-filter predicates.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a booking.
///
/// `Waiting` is the creation state; `Approved` and `Rejected` are terminal
/// and may only be entered from `Waiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

impl BookingStatus {
    /// Storage representation of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownBookingStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(Self::Waiting),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(UnknownBookingStatus(other.to_owned())),
        }
    }
}

/// Error returned when a stored status string is unrecognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown booking status: {0}")]
pub struct UnknownBookingStatus(pub String);

/// Client-supplied filter for booking lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStateFilter {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl BookingStateFilter {
    /// Lower the filter to the predicate evaluated by the repository at the
    /// given instant. Keeping this a data value lets one query site dispatch
    /// on it for both the booker and the owner listings.
    pub fn predicate_at(self, now: DateTime<Utc>) -> BookingPredicate {
        match self {
            Self::All => BookingPredicate::Any,
            Self::Current => BookingPredicate::CurrentAt(now),
            Self::Past => BookingPredicate::EndedBefore(now),
            Self::Future => BookingPredicate::StartsAfter(now),
            Self::Waiting => BookingPredicate::WithStatus(BookingStatus::Waiting),
            Self::Rejected => BookingPredicate::WithStatus(BookingStatus::Rejected),
        }
    }
}

impl FromStr for BookingStateFilter {
    type Err = UnknownBookingState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(Self::All),
            "CURRENT" => Ok(Self::Current),
            "PAST" => Ok(Self::Past),
            "FUTURE" => Ok(Self::Future),
            "WAITING" => Ok(Self::Waiting),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(UnknownBookingState(other.to_owned())),
        }
    }
}

/// Error returned for an unrecognised `state` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown state: {0}")]
pub struct UnknownBookingState(pub String);

/// Storage predicate selecting bookings for a list query.
///
/// Always combined with a [`BookingScope`] and ordered by start descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingPredicate {
    /// No additional restriction.
    Any,
    /// start <= now <= end.
    CurrentAt(DateTime<Utc>),
    /// end < now.
    EndedBefore(DateTime<Utc>),
    /// start > now.
    StartsAfter(DateTime<Utc>),
    /// Exact status match.
    WithStatus(BookingStatus),
}

/// Whose bookings a list query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingScope {
    /// Bookings placed by this user.
    Booker(i64),
    /// Bookings of items owned by this user.
    Owner(i64),
}

/// A persisted booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: BookingStatus,
}

/// Insert payload for a booking; always starts out `Waiting`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: BookingStatus,
}

/// Short item view embedded in booking responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    pub id: i64,
    pub name: String,
}

/// Short user view embedded in booking responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: i64,
    pub name: String,
}

/// A booking joined with the item and booker it references, as loaded by the
/// repository. `item_owner_id` feeds the access checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRecord {
    pub booking: Booking,
    pub item: ItemRef,
    pub item_owner_id: i64,
    pub booker: UserRef,
}

/// Fully assembled booking view returned by the booking service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub item: ItemRef,
    pub booker: UserRef,
}

impl From<BookingRecord> for BookingView {
    fn from(record: BookingRecord) -> Self {
        let BookingRecord {
            booking,
            item,
            booker,
            item_owner_id: _,
        } = record;
        Self {
            id: booking.id,
            start: booking.start,
            end: booking.end,
            status: booking.status,
            item,
            booker,
        }
    }
}
