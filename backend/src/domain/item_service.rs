//! Item domain service: listing rules, owner-only mutation, comment
//! eligibility, and activity assembly (last/next bookings plus comments).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::booking::Booking;
use crate::domain::item::{
    BookingBrief, CommentRecord, Item, ItemDraft, ItemPatch, ItemWithActivity, NewComment,
    NewItem,
};
use crate::domain::ports::{
    BookingRepository, BookingRepositoryError, CommentRepository, CommentRepositoryError,
    ItemRepository, ItemRepositoryError, RequestRepository, RequestRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::user::User;
use crate::domain::Error;

/// Driving port for item operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemService: Send + Sync {
    async fn create(&self, owner_id: i64, draft: ItemDraft) -> Result<Item, Error>;

    async fn update(&self, owner_id: i64, item_id: i64, patch: ItemPatch)
        -> Result<Item, Error>;

    /// Fetch one item with comments; last/next bookings only for the owner.
    async fn get_with_activity(
        &self,
        item_id: i64,
        requester_id: Option<i64>,
    ) -> Result<ItemWithActivity, Error>;

    /// All items of one owner, each with bookings and comments.
    async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<ItemWithActivity>, Error>;

    /// Available items whose name or description contains `text`; a blank
    /// query yields nothing.
    async fn search(&self, text: String) -> Result<Vec<Item>, Error>;

    async fn delete(&self, owner_id: i64, item_id: i64) -> Result<(), Error>;

    /// Leave a comment; only past approved bookers of the item may do so.
    async fn add_comment(
        &self,
        author_id: i64,
        item_id: i64,
        text: Option<String>,
    ) -> Result<CommentRecord, Error>;
}

/// Repository-backed [`ItemService`] implementation.
#[derive(Clone)]
pub struct ItemServiceImpl<I, U, B, C, R> {
    items: Arc<I>,
    users: Arc<U>,
    bookings: Arc<B>,
    comments: Arc<C>,
    requests: Arc<R>,
}

impl<I, U, B, C, R> ItemServiceImpl<I, U, B, C, R> {
    pub fn new(
        items: Arc<I>,
        users: Arc<U>,
        bookings: Arc<B>,
        comments: Arc<C>,
        requests: Arc<R>,
    ) -> Self {
        Self {
            items,
            users,
            bookings,
            comments,
            requests,
        }
    }
}

fn map_item_error(error: ItemRepositoryError) -> Error {
    match error {
        ItemRepositoryError::Connection { message } => Error::service_unavailable(message),
        ItemRepositoryError::Query { message } => Error::internal(message),
        ItemRepositoryError::Duplicate { message } => Error::conflict(message),
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

fn map_booking_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => Error::service_unavailable(message),
        BookingRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => Error::service_unavailable(message),
        CommentRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_request_error(error: RequestRepositoryError) -> Error {
    match error {
        RequestRepositoryError::Connection { message } => Error::service_unavailable(message),
        RequestRepositoryError::Query { message } => Error::internal(message),
    }
}

fn validate_draft(owner_id: i64, draft: ItemDraft) -> Result<NewItem, Error> {
    let name = draft
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| Error::invalid_request("item name must not be blank"))?;
    let description = draft
        .description
        .filter(|description| !description.trim().is_empty())
        .ok_or_else(|| Error::invalid_request("item description must not be blank"))?;
    let available = draft
        .available
        .ok_or_else(|| Error::invalid_request("item availability must be set"))?;

    Ok(NewItem {
        name,
        description,
        available,
        owner_id,
        request_id: draft.request_id,
    })
}

fn brief_for(booking: Booking) -> BookingBrief {
    BookingBrief {
        id: booking.id,
        booker_id: booking.booker_id,
        start: booking.start,
        end: booking.end,
    }
}

impl<I, U, B, C, R> ItemServiceImpl<I, U, B, C, R>
where
    I: ItemRepository,
    U: UserRepository,
    B: BookingRepository,
    C: CommentRepository,
    R: RequestRepository,
{
    async fn require_item(&self, item_id: i64) -> Result<Item, Error> {
        self.items
            .find_by_id(item_id)
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| Error::not_found(format!("item {item_id} not found")))
    }

    async fn require_user(&self, user_id: i64) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }

    async fn require_user_exists(&self, user_id: i64) -> Result<(), Error> {
        let exists = self.users.exists(user_id).await.map_err(map_user_error)?;
        if exists {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {user_id} not found")))
        }
    }

    /// Join an item with its comments and, when the requester owns it, the
    /// nearest past and future approved bookings.
    async fn assemble_activity(
        &self,
        item: Item,
        requester_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<ItemWithActivity, Error> {
        let owner_view = requester_id == Some(item.owner_id);

        let (last_booking, next_booking) = if owner_view {
            let last = self
                .bookings
                .last_approved_for_item(item.id, now)
                .await
                .map_err(map_booking_error)?;
            let next = self
                .bookings
                .next_approved_for_item(item.id, now)
                .await
                .map_err(map_booking_error)?;
            (last.map(brief_for), next.map(brief_for))
        } else {
            (None, None)
        };

        let comments = self
            .comments
            .list_for_item(item.id)
            .await
            .map_err(map_comment_error)?;

        Ok(ItemWithActivity {
            item,
            last_booking,
            next_booking,
            comments,
        })
    }
}

#[async_trait]
impl<I, U, B, C, R> ItemService for ItemServiceImpl<I, U, B, C, R>
where
    I: ItemRepository,
    U: UserRepository,
    B: BookingRepository,
    C: CommentRepository,
    R: RequestRepository,
{
    async fn create(&self, owner_id: i64, draft: ItemDraft) -> Result<Item, Error> {
        let new_item = validate_draft(owner_id, draft)?;

        self.require_user_exists(owner_id).await?;

        if self
            .items
            .find_by_owner_and_name(owner_id, &new_item.name)
            .await
            .map_err(map_item_error)?
            .is_some()
        {
            return Err(Error::conflict(format!(
                "item named '{}' already exists for user {owner_id}",
                new_item.name
            )));
        }

        if let Some(request_id) = new_item.request_id {
            self.requests
                .find_by_id(request_id)
                .await
                .map_err(map_request_error)?
                .ok_or_else(|| Error::not_found(format!("request {request_id} not found")))?;
        }

        self.items.insert(new_item).await.map_err(map_item_error)
    }

    async fn update(
        &self,
        owner_id: i64,
        item_id: i64,
        patch: ItemPatch,
    ) -> Result<Item, Error> {
        let existing = self.require_item(item_id).await?;

        if existing.owner_id != owner_id {
            return Err(Error::forbidden("only the owner may change an item"));
        }

        if patch.is_empty() {
            return Ok(existing);
        }

        self.items
            .update(item_id, patch)
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| Error::not_found(format!("item {item_id} not found")))
    }

    async fn get_with_activity(
        &self,
        item_id: i64,
        requester_id: Option<i64>,
    ) -> Result<ItemWithActivity, Error> {
        let item = self.require_item(item_id).await?;
        self.assemble_activity(item, requester_id, Utc::now()).await
    }

    async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<ItemWithActivity>, Error> {
        self.require_user_exists(owner_id).await?;

        let items = self
            .items
            .list_for_owner(owner_id)
            .await
            .map_err(map_item_error)?;

        let now = Utc::now();
        let mut views = Vec::with_capacity(items.len());
        for item in items {
            views.push(self.assemble_activity(item, Some(owner_id), now).await?);
        }
        Ok(views)
    }

    async fn search(&self, text: String) -> Result<Vec<Item>, Error> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.items
            .search_available(&text)
            .await
            .map_err(map_item_error)
    }

    async fn delete(&self, owner_id: i64, item_id: i64) -> Result<(), Error> {
        let item = self.require_item(item_id).await?;
        self.require_user_exists(owner_id).await?;

        if item.owner_id != owner_id {
            return Err(Error::forbidden("only the owner may delete an item"));
        }

        let deleted = self.items.delete(item_id).await.map_err(map_item_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("item {item_id} not found")))
        }
    }

    async fn add_comment(
        &self,
        author_id: i64,
        item_id: i64,
        text: Option<String>,
    ) -> Result<CommentRecord, Error> {
        let author = self.require_user(author_id).await?;
        let item = self.require_item(item_id).await?;

        let has_booked = self
            .bookings
            .has_completed_for_booker(item.id, author_id, Utc::now())
            .await
            .map_err(map_booking_error)?;
        if !has_booked {
            return Err(Error::invalid_request(
                "comments require a completed booking of the item",
            ));
        }

        let text = text
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::invalid_request("comment text must not be blank"))?;

        let comment = self
            .comments
            .insert(NewComment {
                text,
                item_id: item.id,
                author_id,
                created: Utc::now(),
            })
            .await
            .map_err(map_comment_error)?;

        Ok(CommentRecord {
            comment,
            author_name: author.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::Comment;
    use crate::domain::ports::{
        MockBookingRepository, MockCommentRepository, MockItemRepository, MockRequestRepository,
        MockUserRepository,
    };
    use crate::domain::request::ItemRequest;
    use crate::domain::ErrorCode;
    use chrono::Duration;
    use rstest::rstest;

    const OWNER: i64 = 1;
    const VISITOR: i64 = 2;
    const ITEM: i64 = 10;

    struct Mocks {
        items: MockItemRepository,
        users: MockUserRepository,
        bookings: MockBookingRepository,
        comments: MockCommentRepository,
        requests: MockRequestRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                items: MockItemRepository::new(),
                users: MockUserRepository::new(),
                bookings: MockBookingRepository::new(),
                comments: MockCommentRepository::new(),
                requests: MockRequestRepository::new(),
            }
        }

        fn into_service(
            self,
        ) -> ItemServiceImpl<
            MockItemRepository,
            MockUserRepository,
            MockBookingRepository,
            MockCommentRepository,
            MockRequestRepository,
        > {
            ItemServiceImpl::new(
                Arc::new(self.items),
                Arc::new(self.users),
                Arc::new(self.bookings),
                Arc::new(self.comments),
                Arc::new(self.requests),
            )
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

    fn visitor() -> User {
        User {
            id: VISITOR,
            name: "Visitor".to_owned(),
            email: "visitor@example.com".to_owned(),
        }
    }

    fn draft(name: &str, description: &str, available: Option<bool>) -> ItemDraft {
        ItemDraft {
            name: Some(name.to_owned()),
            description: Some(description.to_owned()),
            available,
            request_id: None,
        }
    }

    fn approved_booking(id: i64, offset: Duration) -> Booking {
        let start = Utc::now() + offset;
        Booking {
            id,
            start,
            end: start + Duration::hours(1),
            item_id: ITEM,
            booker_id: VISITOR,
            status: crate::domain::booking::BookingStatus::Approved,
        }
    }

    #[tokio::test]
    async fn create_persists_a_valid_draft() {
        let mut mocks = Mocks::new();
        mocks.users.expect_exists().return_once(|_| Ok(true));
        mocks
            .items
            .expect_find_by_owner_and_name()
            .return_once(|_, _| Ok(None));
        mocks.items.expect_insert().return_once(|new_item| {
            Ok(Item {
                id: ITEM,
                name: new_item.name,
                description: new_item.description,
                available: new_item.available,
                owner_id: new_item.owner_id,
                request_id: new_item.request_id,
            })
        });

        let item = mocks
            .into_service()
            .create(OWNER, draft("Drill", "Cordless drill", Some(true)))
            .await
            .expect("create succeeds");
        assert_eq!(item.owner_id, OWNER);
        assert!(item.available);
    }

    #[rstest]
    #[case(ItemDraft { name: None, description: Some("d".into()), available: Some(true), request_id: None })]
    #[case(ItemDraft { name: Some(" ".into()), description: Some("d".into()), available: Some(true), request_id: None })]
    #[case(ItemDraft { name: Some("n".into()), description: None, available: Some(true), request_id: None })]
    #[case(ItemDraft { name: Some("n".into()), description: Some("d".into()), available: None, request_id: None })]
    #[tokio::test]
    async fn create_rejects_malformed_drafts(#[case] bad: ItemDraft) {
        let err = Mocks::new()
            .into_service()
            .create(OWNER, bad)
            .await
            .expect_err("invalid");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_name_for_same_owner() {
        let mut mocks = Mocks::new();
        mocks.users.expect_exists().return_once(|_| Ok(true));
        mocks
            .items
            .expect_find_by_owner_and_name()
            .withf(|owner, name| *owner == OWNER && name == "Drill")
            .return_once(|_, _| Ok(Some(drill())));
        mocks.items.expect_insert().times(0);

        let err = mocks
            .into_service()
            .create(OWNER, draft("Drill", "Another drill", Some(true)))
            .await
            .expect_err("conflict");
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn create_resolves_the_linked_request() {
        let mut mocks = Mocks::new();
        mocks.users.expect_exists().return_once(|_| Ok(true));
        mocks
            .items
            .expect_find_by_owner_and_name()
            .return_once(|_, _| Ok(None));
        mocks.requests.expect_find_by_id().return_once(|id| {
            Ok(Some(ItemRequest {
                id,
                description: "need a drill".to_owned(),
                requestor_id: VISITOR,
                created: Utc::now(),
            }))
        });
        mocks.items.expect_insert().return_once(|new_item| {
            Ok(Item {
                id: ITEM,
                name: new_item.name,
                description: new_item.description,
                available: new_item.available,
                owner_id: new_item.owner_id,
                request_id: new_item.request_id,
            })
        });

        let mut item_draft = draft("Drill", "Cordless drill", Some(true));
        item_draft.request_id = Some(55);
        let item = mocks
            .into_service()
            .create(OWNER, item_draft)
            .await
            .expect("create succeeds");
        assert_eq!(item.request_id, Some(55));
    }

    #[tokio::test]
    async fn create_fails_when_linked_request_is_missing() {
        let mut mocks = Mocks::new();
        mocks.users.expect_exists().return_once(|_| Ok(true));
        mocks
            .items
            .expect_find_by_owner_and_name()
            .return_once(|_, _| Ok(None));
        mocks.requests.expect_find_by_id().return_once(|_| Ok(None));
        mocks.items.expect_insert().times(0);

        let mut item_draft = draft("Drill", "Cordless drill", Some(true));
        item_draft.request_id = Some(55);
        let err = mocks
            .into_service()
            .create(OWNER, item_draft)
            .await
            .expect_err("not found");
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn update_is_owner_only() {
        let mut mocks = Mocks::new();
        mocks
            .items
            .expect_find_by_id()
            .return_once(|_| Ok(Some(drill())));
        mocks.items.expect_update().times(0);

        let err = mocks
            .into_service()
            .update(VISITOR, ITEM, ItemPatch::default())
            .await
            .expect_err("forbidden");
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let mut mocks = Mocks::new();
        mocks
            .items
            .expect_find_by_id()
            .return_once(|_| Ok(Some(drill())));
        mocks
            .items
            .expect_update()
            .withf(|id, patch| {
                *id == ITEM && patch.available == Some(false) && patch.name.is_none()
            })
            .return_once(|_, patch| {
                let mut item = drill();
                item.available = patch.available.expect("availability set");
                Ok(Some(item))
            });

        let item = mocks
            .into_service()
            .update(
                OWNER,
                ITEM,
                ItemPatch {
                    available: Some(false),
                    ..ItemPatch::default()
                },
            )
            .await
            .expect("update succeeds");
        assert!(!item.available);
        assert_eq!(item.name, "Drill");
    }

    #[tokio::test]
    async fn update_with_empty_patch_returns_current_state() {
        let mut mocks = Mocks::new();
        mocks
            .items
            .expect_find_by_id()
            .return_once(|_| Ok(Some(drill())));
        mocks.items.expect_update().times(0);

        let item = mocks
            .into_service()
            .update(OWNER, ITEM, ItemPatch::default())
            .await
            .expect("no-op update succeeds");
        assert_eq!(item, drill());
    }

    #[tokio::test]
    async fn owner_view_includes_last_and_next_bookings() {
        let mut mocks = Mocks::new();
        mocks
            .items
            .expect_find_by_id()
            .return_once(|_| Ok(Some(drill())));
        mocks
            .bookings
            .expect_last_approved_for_item()
            .return_once(|_, _| Ok(Some(approved_booking(71, Duration::hours(-3)))));
        mocks
            .bookings
            .expect_next_approved_for_item()
            .return_once(|_, _| Ok(Some(approved_booking(72, Duration::hours(3)))));
        mocks
            .comments
            .expect_list_for_item()
            .return_once(|_| Ok(Vec::new()));

        let view = mocks
            .into_service()
            .get_with_activity(ITEM, Some(OWNER))
            .await
            .expect("fetch succeeds");
        assert_eq!(view.last_booking.map(|b| b.id), Some(71));
        assert_eq!(view.next_booking.map(|b| b.id), Some(72));
    }

    #[rstest]
    #[case(Some(VISITOR))]
    #[case(None)]
    #[tokio::test]
    async fn non_owner_view_hides_bookings_but_keeps_comments(
        #[case] requester: Option<i64>,
    ) {
        let mut mocks = Mocks::new();
        mocks
            .items
            .expect_find_by_id()
            .return_once(|_| Ok(Some(drill())));
        mocks.bookings.expect_last_approved_for_item().times(0);
        mocks.bookings.expect_next_approved_for_item().times(0);
        mocks.comments.expect_list_for_item().return_once(|_| {
            Ok(vec![CommentRecord {
                comment: Comment {
                    id: 5,
                    text: "works great".to_owned(),
                    item_id: ITEM,
                    author_id: VISITOR,
                    created: Utc::now(),
                },
                author_name: "Visitor".to_owned(),
            }])
        });

        let view = mocks
            .into_service()
            .get_with_activity(ITEM, requester)
            .await
            .expect("fetch succeeds");
        assert!(view.last_booking.is_none());
        assert!(view.next_booking.is_none());
        assert_eq!(view.comments.len(), 1);
    }

    #[tokio::test]
    async fn owner_listing_annotates_every_item() {
        let mut mocks = Mocks::new();
        mocks.users.expect_exists().return_once(|_| Ok(true));
        mocks
            .items
            .expect_list_for_owner()
            .return_once(|_| Ok(vec![drill()]));
        mocks
            .bookings
            .expect_last_approved_for_item()
            .return_once(|_, _| Ok(None));
        mocks
            .bookings
            .expect_next_approved_for_item()
            .return_once(|_, _| Ok(Some(approved_booking(72, Duration::hours(3)))));
        mocks
            .comments
            .expect_list_for_item()
            .return_once(|_| Ok(Vec::new()));

        let views = mocks
            .into_service()
            .list_for_owner(OWNER)
            .await
            .expect("listing succeeds");
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].next_booking.as_ref().map(|b| b.id), Some(72));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn blank_search_returns_empty_without_querying(#[case] text: &str) {
        let mut mocks = Mocks::new();
        mocks.items.expect_search_available().times(0);

        let found = mocks
            .into_service()
            .search(text.to_owned())
            .await
            .expect("search succeeds");
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn search_delegates_to_the_repository() {
        let mut mocks = Mocks::new();
        mocks
            .items
            .expect_search_available()
            .withf(|text| text == "drill")
            .return_once(|_| Ok(vec![drill()]));

        let found = mocks
            .into_service()
            .search("drill".to_owned())
            .await
            .expect("search succeeds");
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn delete_is_owner_only() {
        let mut mocks = Mocks::new();
        mocks
            .items
            .expect_find_by_id()
            .return_once(|_| Ok(Some(drill())));
        mocks.users.expect_exists().return_once(|_| Ok(true));
        mocks.items.expect_delete().times(0);

        let err = mocks
            .into_service()
            .delete(VISITOR, ITEM)
            .await
            .expect_err("forbidden");
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn delete_removes_the_item() {
        let mut mocks = Mocks::new();
        mocks
            .items
            .expect_find_by_id()
            .return_once(|_| Ok(Some(drill())));
        mocks.users.expect_exists().return_once(|_| Ok(true));
        mocks.items.expect_delete().return_once(|_| Ok(true));

        mocks
            .into_service()
            .delete(OWNER, ITEM)
            .await
            .expect("delete succeeds");
    }

    #[tokio::test]
    async fn comments_require_a_completed_booking() {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_find_by_id()
            .return_once(|_| Ok(Some(visitor())));
        mocks
            .items
            .expect_find_by_id()
            .return_once(|_| Ok(Some(drill())));
        mocks
            .bookings
            .expect_has_completed_for_booker()
            .return_once(|_, _, _| Ok(false));
        mocks.comments.expect_insert().times(0);

        let err = mocks
            .into_service()
            .add_comment(VISITOR, ITEM, Some("nice".to_owned()))
            .await
            .expect_err("invalid");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("".to_owned()))]
    #[case(Some("   ".to_owned()))]
    #[tokio::test]
    async fn comments_reject_blank_text(#[case] text: Option<String>) {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_find_by_id()
            .return_once(|_| Ok(Some(visitor())));
        mocks
            .items
            .expect_find_by_id()
            .return_once(|_| Ok(Some(drill())));
        mocks
            .bookings
            .expect_has_completed_for_booker()
            .return_once(|_, _, _| Ok(true));
        mocks.comments.expect_insert().times(0);

        let err = mocks
            .into_service()
            .add_comment(VISITOR, ITEM, text)
            .await
            .expect_err("invalid");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn comments_carry_the_author_name() {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_find_by_id()
            .return_once(|_| Ok(Some(visitor())));
        mocks
            .items
            .expect_find_by_id()
            .return_once(|_| Ok(Some(drill())));
        mocks
            .bookings
            .expect_has_completed_for_booker()
            .withf(|item_id, booker_id, _| *item_id == ITEM && *booker_id == VISITOR)
            .return_once(|_, _, _| Ok(true));
        mocks.comments.expect_insert().return_once(|new_comment| {
            Ok(Comment {
                id: 5,
                text: new_comment.text,
                item_id: new_comment.item_id,
                author_id: new_comment.author_id,
                created: new_comment.created,
            })
        });

        let record = mocks
            .into_service()
            .add_comment(VISITOR, ITEM, Some("works great".to_owned()))
            .await
            .expect("comment succeeds");
        assert_eq!(record.author_name, "Visitor");
        assert_eq!(record.comment.text, "works great");
    }
}
