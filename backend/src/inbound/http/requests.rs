//! Item request API handlers.
//!
//! ```text
//! POST /requests
//! GET  /requests
//! GET  /requests/all?from=&size=
//! GET  /requests/{request_id}
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::item::Item;
use crate::domain::request::RequestWithItems;
use crate::domain::Error;
use crate::inbound::http::identity::SharerId;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_page;
use crate::inbound::http::ApiResult;

/// Request payload for creating an item request.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RequestBody {
    pub description: Option<String>,
}

/// Item entry embedded in request responses; carries the owner so a
/// requester can reach out.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestItemBody {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

impl From<Item> for RequestItemBody {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            owner_id: item.owner_id,
            description: item.description,
            available: item.available,
            request_id: item.request_id,
        }
    }
}

/// Item request representation with fulfilling items.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponseBody {
    pub id: i64,
    pub description: String,
    pub created: DateTime<Utc>,
    pub items: Vec<RequestItemBody>,
}

impl From<RequestWithItems> for RequestResponseBody {
    fn from(view: RequestWithItems) -> Self {
        Self {
            id: view.request.id,
            description: view.request.description,
            created: view.request.created,
            items: view.items.into_iter().map(RequestItemBody::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    from: Option<String>,
    size: Option<String>,
}

/// File a request for an item missing from the catalog.
#[utoipa::path(
    post,
    path = "/requests",
    request_body = RequestBody,
    responses(
        (status = 200, description = "Request created", body = RequestResponseBody),
        (status = 400, description = "Blank description", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["requests"],
    operation_id = "createRequest"
)]
#[post("/requests")]
pub async fn create_request(
    state: web::Data<HttpState>,
    requestor: SharerId,
    payload: web::Json<RequestBody>,
) -> ApiResult<web::Json<RequestResponseBody>> {
    let view = state
        .requests
        .create(requestor.0, payload.into_inner().description)
        .await?;
    Ok(web::Json(RequestResponseBody::from(view)))
}

/// Requests made by other users, paginated.
#[utoipa::path(
    get,
    path = "/requests/all",
    responses(
        (status = 200, description = "Other users' requests", body = [RequestResponseBody]),
        (status = 400, description = "Bad pagination", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["requests"],
    operation_id = "listAllRequests"
)]
#[get("/requests/all")]
pub async fn list_all_requests(
    state: web::Data<HttpState>,
    caller: SharerId,
    query: web::Query<RequestListQuery>,
) -> ApiResult<web::Json<Vec<RequestResponseBody>>> {
    let query = query.into_inner();
    let page = parse_page(query.from, query.size)?;

    let views = state.requests.list_others(caller.0, page).await?;
    Ok(web::Json(
        views.into_iter().map(RequestResponseBody::from).collect(),
    ))
}

/// The caller's own requests, newest first.
#[utoipa::path(
    get,
    path = "/requests",
    responses(
        (status = 200, description = "Own requests", body = [RequestResponseBody]),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["requests"],
    operation_id = "listOwnRequests"
)]
#[get("/requests")]
pub async fn list_own_requests(
    state: web::Data<HttpState>,
    caller: SharerId,
) -> ApiResult<web::Json<Vec<RequestResponseBody>>> {
    let views = state.requests.list_own(caller.0).await?;
    Ok(web::Json(
        views.into_iter().map(RequestResponseBody::from).collect(),
    ))
}

/// Fetch one request by id; any existing user may look.
#[utoipa::path(
    get,
    path = "/requests/{request_id}",
    responses(
        (status = 200, description = "Request", body = RequestResponseBody),
        (status = 404, description = "No such request or user", body = Error)
    ),
    tags = ["requests"],
    operation_id = "getRequest"
)]
#[get("/requests/{request_id}")]
pub async fn get_request(
    state: web::Data<HttpState>,
    caller: SharerId,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RequestResponseBody>> {
    let view = state.requests.get(caller.0, path.into_inner()).await?;
    Ok(web::Json(RequestResponseBody::from(view)))
}
