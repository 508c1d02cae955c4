//! PostgreSQL-backed [`BookingRepository`] implementation using Diesel.
//!
//! List queries join the item and booker rows in one round trip; the status
//! transition is a single conditional `UPDATE` so it acts as a
//! compare-and-swap on the WAITING state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::booking::{
    Booking, BookingPredicate, BookingRecord, BookingScope, BookingStatus, ItemRef, NewBooking,
    UserRef,
};
use crate::domain::page::Page;
use crate::domain::ports::{BookingRepository, BookingRepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BookingRow, ItemRow, NewBookingRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, items, users};

/// Diesel-backed implementation of the booking repository port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> BookingRepositoryError {
    map_pool_error(error, BookingRepositoryError::connection)
}

fn map_read(error: diesel::result::Error) -> BookingRepositoryError {
    map_diesel_error(
        error,
        BookingRepositoryError::query,
        BookingRepositoryError::connection,
    )
}

/// Convert a raw row into a validated domain booking.
fn row_to_booking(row: BookingRow) -> Result<Booking, BookingRepositoryError> {
    let status: BookingStatus = row
        .status
        .parse()
        .map_err(|err: crate::domain::booking::UnknownBookingStatus| {
            BookingRepositoryError::query(err.to_string())
        })?;

    Ok(Booking {
        id: row.id,
        start: row.start_date,
        end: row.end_date,
        item_id: row.item_id,
        booker_id: row.booker_id,
        status,
    })
}

/// Assemble a joined (booking, item, booker) row group into a record.
fn rows_to_record(
    (booking, item, booker): (BookingRow, ItemRow, UserRow),
) -> Result<BookingRecord, BookingRepositoryError> {
    Ok(BookingRecord {
        booking: row_to_booking(booking)?,
        item: ItemRef {
            id: item.id,
            name: item.name,
        },
        item_owner_id: item.owner_id,
        booker: UserRef {
            id: booker.id,
            name: booker.name,
        },
    })
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn insert(&self, booking: NewBooking) -> Result<Booking, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = diesel::insert_into(bookings::table)
            .values(NewBookingRow {
                start_date: booking.start,
                end_date: booking.end,
                item_id: booking.item_id,
                booker_id: booking.booker_id,
                status: booking.status.as_str(),
            })
            .returning(BookingRow::as_returning())
            .get_result::<BookingRow>(&mut conn)
            .await
            .map_err(map_read)?;

        row_to_booking(row)
    }

    async fn find_record(
        &self,
        booking_id: i64,
    ) -> Result<Option<BookingRecord>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = bookings::table
            .inner_join(items::table)
            .inner_join(users::table)
            .filter(bookings::id.eq(booking_id))
            .select((
                BookingRow::as_select(),
                ItemRow::as_select(),
                UserRow::as_select(),
            ))
            .first::<(BookingRow, ItemRow, UserRow)>(&mut conn)
            .await
            .optional()
            .map_err(map_read)?;

        row.map(rows_to_record).transpose()
    }

    async fn update_status_if_waiting(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = diesel::update(
            bookings::table
                .filter(bookings::id.eq(booking_id))
                .filter(bookings::status.eq(BookingStatus::Waiting.as_str())),
        )
        .set(bookings::status.eq(status.as_str()))
        .returning(BookingRow::as_returning())
        .get_result::<BookingRow>(&mut conn)
        .await
        .optional()
        .map_err(map_read)?;

        row.map(row_to_booking).transpose()
    }

    async fn list(
        &self,
        scope: BookingScope,
        predicate: BookingPredicate,
        page: Page,
    ) -> Result<Vec<BookingRecord>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let mut query = bookings::table
            .inner_join(items::table)
            .inner_join(users::table)
            .select((
                BookingRow::as_select(),
                ItemRow::as_select(),
                UserRow::as_select(),
            ))
            .into_boxed();

        query = match scope {
            BookingScope::Booker(booker_id) => query.filter(bookings::booker_id.eq(booker_id)),
            BookingScope::Owner(owner_id) => query.filter(items::owner_id.eq(owner_id)),
        };

        query = match predicate {
            BookingPredicate::Any => query,
            BookingPredicate::CurrentAt(now) => query
                .filter(bookings::start_date.le(now))
                .filter(bookings::end_date.ge(now)),
            BookingPredicate::EndedBefore(now) => query.filter(bookings::end_date.lt(now)),
            BookingPredicate::StartsAfter(now) => query.filter(bookings::start_date.gt(now)),
            BookingPredicate::WithStatus(status) => {
                query.filter(bookings::status.eq(status.as_str()))
            }
        };

        let rows = query
            .order(bookings::start_date.desc())
            .offset(page.offset())
            .limit(page.limit())
            .load::<(BookingRow, ItemRow, UserRow)>(&mut conn)
            .await
            .map_err(map_read)?;

        rows.into_iter().map(rows_to_record).collect()
    }

    async fn last_approved_for_item(
        &self,
        item_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = bookings::table
            .filter(bookings::item_id.eq(item_id))
            .filter(bookings::status.eq(BookingStatus::Approved.as_str()))
            .filter(bookings::end_date.lt(now))
            .order(bookings::end_date.desc())
            .select(BookingRow::as_select())
            .first::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_read)?;

        row.map(row_to_booking).transpose()
    }

    async fn next_approved_for_item(
        &self,
        item_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = bookings::table
            .filter(bookings::item_id.eq(item_id))
            .filter(bookings::status.eq(BookingStatus::Approved.as_str()))
            .filter(bookings::end_date.gt(now))
            .order(bookings::start_date.asc())
            .select(BookingRow::as_select())
            .first::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_read)?;

        row.map(row_to_booking).transpose()
    }

    async fn has_completed_for_booker(
        &self,
        item_id: i64,
        booker_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::select(diesel::dsl::exists(
            bookings::table
                .filter(bookings::item_id.eq(item_id))
                .filter(bookings::booker_id.eq(booker_id))
                .filter(bookings::status.eq(BookingStatus::Approved.as_str()))
                .filter(bookings::end_date.lt(now)),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_read)
    }
}
