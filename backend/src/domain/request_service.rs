//! Item request domain service: creation and item-annotated listings.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::item::Item;
use crate::domain::page::Page;
use crate::domain::ports::{
    ItemRepository, ItemRepositoryError, RequestRepository, RequestRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::request::{ItemRequest, NewItemRequest, RequestWithItems};
use crate::domain::Error;

/// Driving port for item request operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestService: Send + Sync {
    async fn create(
        &self,
        user_id: i64,
        description: Option<String>,
    ) -> Result<RequestWithItems, Error>;

    /// Requests authored by `user_id`, newest first, with fulfilling items.
    async fn list_own(&self, user_id: i64) -> Result<Vec<RequestWithItems>, Error>;

    /// Requests authored by other users, newest first, paginated.
    async fn list_others(&self, user_id: i64, page: Page)
        -> Result<Vec<RequestWithItems>, Error>;

    /// Any existing user may view any request.
    async fn get(&self, user_id: i64, request_id: i64) -> Result<RequestWithItems, Error>;
}

/// Repository-backed [`RequestService`] implementation.
#[derive(Clone)]
pub struct RequestServiceImpl<R, U, I> {
    requests: Arc<R>,
    users: Arc<U>,
    items: Arc<I>,
}

impl<R, U, I> RequestServiceImpl<R, U, I> {
    pub fn new(requests: Arc<R>, users: Arc<U>, items: Arc<I>) -> Self {
        Self {
            requests,
            users,
            items,
        }
    }
}

fn map_request_error(error: RequestRepositoryError) -> Error {
    match error {
        RequestRepositoryError::Connection { message } => Error::service_unavailable(message),
        RequestRepositoryError::Query { message } => Error::internal(message),
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

/// Group fulfilling items under their requests, preserving request order.
fn annotate(requests: Vec<ItemRequest>, items: Vec<Item>) -> Vec<RequestWithItems> {
    let mut by_request: HashMap<i64, Vec<Item>> = HashMap::new();
    for item in items {
        if let Some(request_id) = item.request_id {
            by_request.entry(request_id).or_default().push(item);
        }
    }

    requests
        .into_iter()
        .map(|request| {
            let items = by_request.remove(&request.id).unwrap_or_default();
            RequestWithItems { request, items }
        })
        .collect()
}

impl<R, U, I> RequestServiceImpl<R, U, I>
where
    R: RequestRepository,
    U: UserRepository,
    I: ItemRepository,
{
    async fn require_user_exists(&self, user_id: i64) -> Result<(), Error> {
        let exists = self.users.exists(user_id).await.map_err(map_user_error)?;
        if exists {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {user_id} not found")))
        }
    }

    async fn annotate_all(
        &self,
        requests: Vec<ItemRequest>,
    ) -> Result<Vec<RequestWithItems>, Error> {
        let ids: Vec<i64> = requests.iter().map(|request| request.id).collect();
        let items = if ids.is_empty() {
            Vec::new()
        } else {
            self.items
                .list_by_requests(ids)
                .await
                .map_err(map_item_error)?
        };
        Ok(annotate(requests, items))
    }
}

#[async_trait]
impl<R, U, I> RequestService for RequestServiceImpl<R, U, I>
where
    R: RequestRepository,
    U: UserRepository,
    I: ItemRepository,
{
    async fn create(
        &self,
        user_id: i64,
        description: Option<String>,
    ) -> Result<RequestWithItems, Error> {
        self.require_user_exists(user_id).await?;

        let description = description
            .filter(|description| !description.trim().is_empty())
            .ok_or_else(|| Error::invalid_request("request description must not be blank"))?;

        let request = self
            .requests
            .insert(NewItemRequest {
                description,
                requestor_id: user_id,
                created: Utc::now(),
            })
            .await
            .map_err(map_request_error)?;

        Ok(RequestWithItems {
            request,
            items: Vec::new(),
        })
    }

    async fn list_own(&self, user_id: i64) -> Result<Vec<RequestWithItems>, Error> {
        self.require_user_exists(user_id).await?;

        let requests = self
            .requests
            .list_for_requestor(user_id)
            .await
            .map_err(map_request_error)?;

        self.annotate_all(requests).await
    }

    async fn list_others(
        &self,
        user_id: i64,
        page: Page,
    ) -> Result<Vec<RequestWithItems>, Error> {
        self.require_user_exists(user_id).await?;

        let requests = self
            .requests
            .list_excluding_requestor(user_id, page)
            .await
            .map_err(map_request_error)?;

        self.annotate_all(requests).await
    }

    async fn get(&self, user_id: i64, request_id: i64) -> Result<RequestWithItems, Error> {
        self.require_user_exists(user_id).await?;

        let request = self
            .requests
            .find_by_id(request_id)
            .await
            .map_err(map_request_error)?
            .ok_or_else(|| Error::not_found(format!("request {request_id} not found")))?;

        self.annotate_all(vec![request])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::internal("request annotation produced no entry"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockItemRepository, MockRequestRepository, MockUserRepository,
    };
    use crate::domain::ErrorCode;
    use chrono::Duration;
    use rstest::rstest;

    const REQUESTOR: i64 = 2;
    const OTHER: i64 = 3;

    type Service =
        RequestServiceImpl<MockRequestRepository, MockUserRepository, MockItemRepository>;

    fn make_service(
        requests: MockRequestRepository,
        users: MockUserRepository,
        items: MockItemRepository,
    ) -> Service {
        RequestServiceImpl::new(Arc::new(requests), Arc::new(users), Arc::new(items))
    }

    fn existing_user() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users.expect_exists().return_once(|_| Ok(true));
        users
    }

    fn request(id: i64, age: Duration) -> ItemRequest {
        ItemRequest {
            id,
            description: format!("request {id}"),
            requestor_id: REQUESTOR,
            created: Utc::now() - age,
        }
    }

    fn fulfilling_item(id: i64, request_id: i64) -> Item {
        Item {
            id,
            name: format!("item {id}"),
            description: "fulfils a request".to_owned(),
            available: true,
            owner_id: OTHER,
            request_id: Some(request_id),
        }
    }

    #[tokio::test]
    async fn create_stamps_and_persists_the_request() {
        let mut requests = MockRequestRepository::new();
        requests
            .expect_insert()
            .withf(|new_request| new_request.requestor_id == REQUESTOR)
            .return_once(|new_request| {
                Ok(ItemRequest {
                    id: 1,
                    description: new_request.description,
                    requestor_id: new_request.requestor_id,
                    created: new_request.created,
                })
            });

        let view = make_service(requests, existing_user(), MockItemRepository::new())
            .create(REQUESTOR, Some("need a ladder".to_owned()))
            .await
            .expect("create succeeds");
        assert_eq!(view.request.description, "need a ladder");
        assert!(view.items.is_empty());
    }

    #[rstest]
    #[case(None)]
    #[case(Some("  ".to_owned()))]
    #[tokio::test]
    async fn create_rejects_blank_descriptions(#[case] description: Option<String>) {
        let mut requests = MockRequestRepository::new();
        requests.expect_insert().times(0);

        let err = make_service(requests, existing_user(), MockItemRepository::new())
            .create(REQUESTOR, description)
            .await
            .expect_err("invalid");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn create_requires_an_existing_user() {
        let mut users = MockUserRepository::new();
        users.expect_exists().return_once(|_| Ok(false));

        let err = make_service(
            MockRequestRepository::new(),
            users,
            MockItemRepository::new(),
        )
        .create(REQUESTOR, Some("need a ladder".to_owned()))
        .await
        .expect_err("not found");
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn own_listing_attaches_fulfilling_items() {
        let mut requests = MockRequestRepository::new();
        requests
            .expect_list_for_requestor()
            .return_once(|_| Ok(vec![request(1, Duration::hours(1)), request(2, Duration::hours(2))]));

        let mut items = MockItemRepository::new();
        items
            .expect_list_by_requests()
            .withf(|ids| ids == &[1, 2])
            .return_once(|_| Ok(vec![fulfilling_item(10, 2), fulfilling_item(11, 2)]));

        let views = make_service(requests, existing_user(), items)
            .list_own(REQUESTOR)
            .await
            .expect("listing succeeds");
        assert_eq!(views.len(), 2);
        assert!(views[0].items.is_empty());
        assert_eq!(views[1].items.len(), 2);
    }

    #[tokio::test]
    async fn own_listing_skips_item_lookup_when_empty() {
        let mut requests = MockRequestRepository::new();
        requests
            .expect_list_for_requestor()
            .return_once(|_| Ok(Vec::new()));
        let mut items = MockItemRepository::new();
        items.expect_list_by_requests().times(0);

        let views = make_service(requests, existing_user(), items)
            .list_own(REQUESTOR)
            .await
            .expect("listing succeeds");
        assert!(views.is_empty());
    }

    #[tokio::test]
    async fn others_listing_passes_the_page_through() {
        let page = Page::new(5, 2).expect("valid page");

        let mut requests = MockRequestRepository::new();
        requests
            .expect_list_excluding_requestor()
            .withf(move |user_id, got| *user_id == REQUESTOR && *got == page)
            .return_once(|_, _| Ok(vec![request(3, Duration::hours(1))]));
        let mut items = MockItemRepository::new();
        items
            .expect_list_by_requests()
            .return_once(|_| Ok(Vec::new()));

        let views = make_service(requests, existing_user(), items)
            .list_others(REQUESTOR, page)
            .await
            .expect("listing succeeds");
        assert_eq!(views.len(), 1);
    }

    #[tokio::test]
    async fn get_returns_any_request_to_any_existing_user() {
        let mut requests = MockRequestRepository::new();
        requests
            .expect_find_by_id()
            .return_once(|_| Ok(Some(request(3, Duration::hours(1)))));
        let mut items = MockItemRepository::new();
        items
            .expect_list_by_requests()
            .return_once(|_| Ok(vec![fulfilling_item(10, 3)]));

        let view = make_service(requests, existing_user(), items)
            .get(OTHER, 3)
            .await
            .expect("fetch succeeds");
        assert_eq!(view.request.id, 3);
        assert_eq!(view.items.len(), 1);
    }

    #[tokio::test]
    async fn get_missing_request_is_not_found() {
        let mut requests = MockRequestRepository::new();
        requests.expect_find_by_id().return_once(|_| Ok(None));

        let err = make_service(requests, existing_user(), MockItemRepository::new())
            .get(OTHER, 3)
            .await
            .expect_err("not found");
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
