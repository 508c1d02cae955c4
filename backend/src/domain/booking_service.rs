//! Booking domain service: creation rules, owner-only resolution, visibility,
//! and state-filtered listings.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::booking::{
    Booking, BookingRecord, BookingScope, BookingStateFilter, BookingStatus, BookingView, ItemRef,
    NewBooking, UserRef,
};
use crate::domain::page::Page;
use crate::domain::ports::{
    BookingRepository, BookingRepositoryError, ItemRepository, ItemRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::Error;

/// Driving port for booking operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Create a WAITING booking of `item_id` for `booker_id`.
    async fn create(
        &self,
        booker_id: i64,
        item_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<BookingView, Error>;

    /// Resolve a WAITING booking to APPROVED or REJECTED; item owner only.
    async fn update_status(
        &self,
        owner_id: i64,
        booking_id: i64,
        approved: bool,
    ) -> Result<BookingView, Error>;

    /// Fetch one booking; visible to the booker and the item owner only.
    async fn get(&self, user_id: i64, booking_id: i64) -> Result<BookingView, Error>;

    /// Bookings placed by `booker_id`, filtered by `state`, newest start first.
    async fn list_for_booker(
        &self,
        booker_id: i64,
        state: BookingStateFilter,
        page: Page,
    ) -> Result<Vec<BookingView>, Error>;

    /// Bookings of items owned by `owner_id`, filtered by `state`, newest
    /// start first.
    async fn list_for_owner(
        &self,
        owner_id: i64,
        state: BookingStateFilter,
        page: Page,
    ) -> Result<Vec<BookingView>, Error>;
}

/// Repository-backed [`BookingService`] implementation.
#[derive(Clone)]
pub struct BookingServiceImpl<B, U, I> {
    bookings: Arc<B>,
    users: Arc<U>,
    items: Arc<I>,
}

impl<B, U, I> BookingServiceImpl<B, U, I> {
    pub fn new(bookings: Arc<B>, users: Arc<U>, items: Arc<I>) -> Self {
        Self {
            bookings,
            users,
            items,
        }
    }
}

fn map_booking_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => Error::service_unavailable(message),
        BookingRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } | UserRepositoryError::Duplicate { message } => {
            Error::internal(message)
        }
    }
}

fn map_item_error(error: ItemRepositoryError) -> Error {
    match error {
        ItemRepositoryError::Connection { message } => Error::service_unavailable(message),
        ItemRepositoryError::Query { message } | ItemRepositoryError::Duplicate { message } => {
            Error::internal(message)
        }
    }
}

fn view_for(booking: Booking, item: ItemRef, booker: UserRef) -> BookingView {
    BookingView {
        id: booking.id,
        start: booking.start,
        end: booking.end,
        status: booking.status,
        item,
        booker,
    }
}

impl<B, U, I> BookingServiceImpl<B, U, I>
where
    B: BookingRepository,
    U: UserRepository,
    I: ItemRepository,
{
    async fn require_subject(&self, user_id: i64) -> Result<(), Error> {
        let exists = self.users.exists(user_id).await.map_err(map_user_error)?;
        if exists {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {user_id} not found")))
        }
    }

    async fn require_record(&self, booking_id: i64) -> Result<BookingRecord, Error> {
        self.bookings
            .find_record(booking_id)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::not_found(format!("booking {booking_id} not found")))
    }

    async fn list(
        &self,
        subject_id: i64,
        scope: BookingScope,
        state: BookingStateFilter,
        page: Page,
    ) -> Result<Vec<BookingView>, Error> {
        self.require_subject(subject_id).await?;

        let predicate = state.predicate_at(Utc::now());
        let records = self
            .bookings
            .list(scope, predicate, page)
            .await
            .map_err(map_booking_error)?;

        Ok(records.into_iter().map(BookingView::from).collect())
    }
}

#[async_trait]
impl<B, U, I> BookingService for BookingServiceImpl<B, U, I>
where
    B: BookingRepository,
    U: UserRepository,
    I: ItemRepository,
{
    async fn create(
        &self,
        booker_id: i64,
        item_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<BookingView, Error> {
        let booker = self
            .users
            .find_by_id(booker_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {booker_id} not found")))?;

        let item = self
            .items
            .find_by_id(item_id)
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| Error::not_found(format!("item {item_id} not found")))?;

        if !item.available {
            return Err(Error::invalid_request("item is not available for booking"));
        }
        if item.owner_id == booker_id {
            return Err(Error::forbidden("owners cannot book their own items"));
        }
        if start >= end {
            return Err(Error::invalid_request("booking dates are invalid"));
        }

        let booking = self
            .bookings
            .insert(NewBooking {
                start,
                end,
                item_id,
                booker_id,
                status: BookingStatus::Waiting,
            })
            .await
            .map_err(map_booking_error)?;

        Ok(view_for(
            booking,
            ItemRef {
                id: item.id,
                name: item.name,
            },
            UserRef {
                id: booker.id,
                name: booker.name,
            },
        ))
    }

    async fn update_status(
        &self,
        owner_id: i64,
        booking_id: i64,
        approved: bool,
    ) -> Result<BookingView, Error> {
        let record = self.require_record(booking_id).await?;

        if record.item_owner_id != owner_id {
            return Err(Error::forbidden("only the item owner may resolve a booking"));
        }

        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };

        // The conditional update is the whole state machine: losing a race
        // against a concurrent resolution looks exactly like arriving late.
        let booking = self
            .bookings
            .update_status_if_waiting(booking_id, status)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::invalid_request("booking has already been resolved"))?;

        Ok(view_for(booking, record.item, record.booker))
    }

    async fn get(&self, user_id: i64, booking_id: i64) -> Result<BookingView, Error> {
        let record = self.require_record(booking_id).await?;

        if record.booking.booker_id != user_id && record.item_owner_id != user_id {
            return Err(Error::forbidden("access denied"));
        }

        Ok(BookingView::from(record))
    }

    async fn list_for_booker(
        &self,
        booker_id: i64,
        state: BookingStateFilter,
        page: Page,
    ) -> Result<Vec<BookingView>, Error> {
        self.list(booker_id, BookingScope::Booker(booker_id), state, page)
            .await
    }

    async fn list_for_owner(
        &self,
        owner_id: i64,
        state: BookingStateFilter,
        page: Page,
    ) -> Result<Vec<BookingView>, Error> {
        self.list(owner_id, BookingScope::Owner(owner_id), state, page)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::BookingPredicate;
    use crate::domain::item::Item;
    use crate::domain::ports::{MockBookingRepository, MockItemRepository, MockUserRepository};
    use crate::domain::user::User;
    use crate::domain::ErrorCode;
    use chrono::Duration;
    use rstest::rstest;

    const OWNER: i64 = 1;
    const BOOKER: i64 = 2;
    const STRANGER: i64 = 3;
    const ITEM: i64 = 10;
    const BOOKING: i64 = 100;

    type Service =
        BookingServiceImpl<MockBookingRepository, MockUserRepository, MockItemRepository>;

    fn make_service(
        bookings: MockBookingRepository,
        users: MockUserRepository,
        items: MockItemRepository,
    ) -> Service {
        BookingServiceImpl::new(Arc::new(bookings), Arc::new(users), Arc::new(items))
    }

    fn booker() -> User {
        User {
            id: BOOKER,
            name: "Booker".to_owned(),
            email: "booker@example.com".to_owned(),
        }
    }

    fn drill() -> Item {
        Item {
            id: ITEM,
            name: "Drill".to_owned(),
            description: "Cordless drill".to_owned(),
            available: true,
            owner_id: OWNER,
            request_id: None,
        }
    }

    fn waiting_booking(start: DateTime<Utc>, end: DateTime<Utc>) -> Booking {
        Booking {
            id: BOOKING,
            start,
            end,
            item_id: ITEM,
            booker_id: BOOKER,
            status: BookingStatus::Waiting,
        }
    }

    fn record(status: BookingStatus) -> BookingRecord {
        let now = Utc::now();
        BookingRecord {
            booking: Booking {
                status,
                ..waiting_booking(now + Duration::hours(1), now + Duration::hours(2))
            },
            item: ItemRef {
                id: ITEM,
                name: "Drill".to_owned(),
            },
            item_owner_id: OWNER,
            booker: UserRef {
                id: BOOKER,
                name: "Booker".to_owned(),
            },
        }
    }

    fn users_with_booker() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(|_| Ok(Some(booker())));
        users
    }

    fn items_with_drill(item: Item) -> MockItemRepository {
        let mut items = MockItemRepository::new();
        items.expect_find_by_id().return_once(move |_| Ok(Some(item)));
        items
    }

    #[tokio::test]
    async fn create_produces_a_waiting_booking() {
        let now = Utc::now();
        let (start, end) = (now + Duration::hours(1), now + Duration::hours(2));

        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_insert()
            .withf(|new_booking| new_booking.status == BookingStatus::Waiting)
            .return_once(move |new_booking| {
                Ok(Booking {
                    id: BOOKING,
                    start: new_booking.start,
                    end: new_booking.end,
                    item_id: new_booking.item_id,
                    booker_id: new_booking.booker_id,
                    status: new_booking.status,
                })
            });

        let service = make_service(bookings, users_with_booker(), items_with_drill(drill()));
        let view = service
            .create(BOOKER, ITEM, start, end)
            .await
            .expect("create succeeds");

        assert_eq!(view.status, BookingStatus::Waiting);
        assert_eq!(view.item.name, "Drill");
        assert_eq!(view.booker.id, BOOKER);
    }

    #[tokio::test]
    async fn create_rejects_unavailable_items() {
        let item = Item {
            available: false,
            ..drill()
        };
        let mut bookings = MockBookingRepository::new();
        bookings.expect_insert().times(0);

        let now = Utc::now();
        let err = make_service(bookings, users_with_booker(), items_with_drill(item))
            .create(BOOKER, ITEM, now + Duration::hours(1), now + Duration::hours(2))
            .await
            .expect_err("invalid");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn create_forbids_owners_booking_their_own_item() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| {
            Ok(Some(User {
                id: OWNER,
                name: "Owner".to_owned(),
                email: "owner@example.com".to_owned(),
            }))
        });
        let mut bookings = MockBookingRepository::new();
        bookings.expect_insert().times(0);

        let now = Utc::now();
        let err = make_service(bookings, users, items_with_drill(drill()))
            .create(OWNER, ITEM, now + Duration::hours(1), now + Duration::hours(2))
            .await
            .expect_err("forbidden");
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(Duration::hours(2), Duration::hours(1))]
    #[case(Duration::hours(1), Duration::hours(1))]
    #[tokio::test]
    async fn create_rejects_non_positive_ranges(
        #[case] start_offset: Duration,
        #[case] end_offset: Duration,
    ) {
        let mut bookings = MockBookingRepository::new();
        bookings.expect_insert().times(0);

        let now = Utc::now();
        let err = make_service(bookings, users_with_booker(), items_with_drill(drill()))
            .create(BOOKER, ITEM, now + start_offset, now + end_offset)
            .await
            .expect_err("invalid");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn create_requires_an_existing_booker() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));
        let items = MockItemRepository::new();
        let bookings = MockBookingRepository::new();

        let now = Utc::now();
        let err = make_service(bookings, users, items)
            .create(BOOKER, ITEM, now, now + Duration::hours(1))
            .await
            .expect_err("not found");
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn approve_resolves_a_waiting_booking() {
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_record()
            .return_once(|_| Ok(Some(record(BookingStatus::Waiting))));
        bookings
            .expect_update_status_if_waiting()
            .withf(|id, status| *id == BOOKING && *status == BookingStatus::Approved)
            .return_once(|_, status| {
                let mut booking = record(BookingStatus::Waiting).booking;
                booking.status = status;
                Ok(Some(booking))
            });

        let view = make_service(bookings, MockUserRepository::new(), MockItemRepository::new())
            .update_status(OWNER, BOOKING, true)
            .await
            .expect("approval succeeds");
        assert_eq!(view.status, BookingStatus::Approved);
    }

    #[tokio::test]
    async fn reject_maps_to_rejected_status() {
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_record()
            .return_once(|_| Ok(Some(record(BookingStatus::Waiting))));
        bookings
            .expect_update_status_if_waiting()
            .withf(|_, status| *status == BookingStatus::Rejected)
            .return_once(|_, status| {
                let mut booking = record(BookingStatus::Waiting).booking;
                booking.status = status;
                Ok(Some(booking))
            });

        let view = make_service(bookings, MockUserRepository::new(), MockItemRepository::new())
            .update_status(OWNER, BOOKING, false)
            .await
            .expect("rejection succeeds");
        assert_eq!(view.status, BookingStatus::Rejected);
    }

    #[tokio::test]
    async fn only_the_item_owner_may_resolve() {
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_record()
            .return_once(|_| Ok(Some(record(BookingStatus::Waiting))));
        bookings.expect_update_status_if_waiting().times(0);

        let err = make_service(bookings, MockUserRepository::new(), MockItemRepository::new())
            .update_status(BOOKER, BOOKING, true)
            .await
            .expect_err("forbidden");
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn resolving_twice_fails_validation() {
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_record()
            .return_once(|_| Ok(Some(record(BookingStatus::Approved))));
        // The CAS misses because the row is no longer WAITING.
        bookings
            .expect_update_status_if_waiting()
            .return_once(|_, _| Ok(None));

        let err = make_service(bookings, MockUserRepository::new(), MockItemRepository::new())
            .update_status(OWNER, BOOKING, false)
            .await
            .expect_err("already resolved");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(BOOKER)]
    #[case(OWNER)]
    #[tokio::test]
    async fn get_is_visible_to_booker_and_owner(#[case] caller: i64) {
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_record()
            .return_once(|_| Ok(Some(record(BookingStatus::Waiting))));

        make_service(bookings, MockUserRepository::new(), MockItemRepository::new())
            .get(caller, BOOKING)
            .await
            .expect("visible");
    }

    #[tokio::test]
    async fn get_denies_third_parties() {
        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_find_record()
            .return_once(|_| Ok(Some(record(BookingStatus::Waiting))));

        let err = make_service(bookings, MockUserRepository::new(), MockItemRepository::new())
            .get(STRANGER, BOOKING)
            .await
            .expect_err("forbidden");
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn get_missing_booking_is_not_found() {
        let mut bookings = MockBookingRepository::new();
        bookings.expect_find_record().return_once(|_| Ok(None));

        let err = make_service(bookings, MockUserRepository::new(), MockItemRepository::new())
            .get(BOOKER, BOOKING)
            .await
            .expect_err("not found");
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[rstest]
    #[case(BookingStateFilter::All)]
    #[case(BookingStateFilter::Current)]
    #[case(BookingStateFilter::Past)]
    #[case(BookingStateFilter::Future)]
    #[case(BookingStateFilter::Waiting)]
    #[case(BookingStateFilter::Rejected)]
    #[tokio::test]
    async fn booker_listing_dispatches_the_matching_predicate(#[case] state: BookingStateFilter) {
        let mut users = MockUserRepository::new();
        users.expect_exists().return_once(|_| Ok(true));

        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_list()
            .withf(move |scope, predicate, page| {
                let scope_ok = matches!(scope, BookingScope::Booker(id) if *id == BOOKER);
                let predicate_ok = match (state, predicate) {
                    (BookingStateFilter::All, BookingPredicate::Any)
                    | (BookingStateFilter::Current, BookingPredicate::CurrentAt(_))
                    | (BookingStateFilter::Past, BookingPredicate::EndedBefore(_))
                    | (BookingStateFilter::Future, BookingPredicate::StartsAfter(_)) => true,
                    (
                        BookingStateFilter::Waiting,
                        BookingPredicate::WithStatus(BookingStatus::Waiting),
                    ) => true,
                    (
                        BookingStateFilter::Rejected,
                        BookingPredicate::WithStatus(BookingStatus::Rejected),
                    ) => true,
                    _ => false,
                };
                scope_ok && predicate_ok && page.limit() == 10
            })
            .return_once(|_, _, _| Ok(vec![record(BookingStatus::Waiting)]));

        let views = make_service(bookings, users, MockItemRepository::new())
            .list_for_booker(BOOKER, state, Page::default())
            .await
            .expect("listing succeeds");
        assert_eq!(views.len(), 1);
    }

    #[tokio::test]
    async fn owner_listing_scopes_to_owned_items() {
        let mut users = MockUserRepository::new();
        users.expect_exists().return_once(|_| Ok(true));

        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_list()
            .withf(|scope, _, _| matches!(scope, BookingScope::Owner(id) if *id == OWNER))
            .return_once(|_, _, _| Ok(Vec::new()));

        let views = make_service(bookings, users, MockItemRepository::new())
            .list_for_owner(OWNER, BookingStateFilter::All, Page::default())
            .await
            .expect("listing succeeds");
        assert!(views.is_empty());
    }

    #[tokio::test]
    async fn listings_require_an_existing_subject() {
        let mut users = MockUserRepository::new();
        users.expect_exists().return_once(|_| Ok(false));
        let mut bookings = MockBookingRepository::new();
        bookings.expect_list().times(0);

        let err = make_service(bookings, users, MockItemRepository::new())
            .list_for_booker(BOOKER, BookingStateFilter::All, Page::default())
            .await
            .expect_err("not found");
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
