//! User API handlers.
//!
//! ```text
//! POST   /users
//! GET    /users
//! GET    /users/{user_id}
//! PATCH  /users/{user_id}
//! DELETE /users/{user_id}
//! ```

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::user::{User, UserDraft, UserPatch};
use crate::domain::Error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request payload for creating or patching a user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserBody {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// User representation returned by every user endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponseBody {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponseBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserBody,
    responses(
        (status = 200, description = "User created", body = UserResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already in use", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserBody>,
) -> ApiResult<web::Json<UserResponseBody>> {
    let body = payload.into_inner();
    let user = state
        .users
        .create(UserDraft {
            name: body.name,
            email: body.email,
        })
        .await?;
    Ok(web::Json(UserResponseBody::from(user)))
}

/// List all users.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [UserResponseBody])
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<UserResponseBody>>> {
    let users = state.users.list().await?;
    Ok(web::Json(
        users.into_iter().map(UserResponseBody::from).collect(),
    ))
}

/// Fetch one user by id.
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    responses(
        (status = 200, description = "User", body = UserResponseBody),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponseBody>> {
    let user = state.users.get(path.into_inner()).await?;
    Ok(web::Json(UserResponseBody::from(user)))
}

/// Partially update a user; only supplied fields overwrite.
#[utoipa::path(
    patch,
    path = "/users/{user_id}",
    request_body = UserBody,
    responses(
        (status = 200, description = "Updated user", body = UserResponseBody),
        (status = 404, description = "No such user", body = Error),
        (status = 409, description = "Email already in use", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UserBody>,
) -> ApiResult<web::Json<UserResponseBody>> {
    let body = payload.into_inner();
    let user = state
        .users
        .update(
            path.into_inner(),
            UserPatch {
                name: body.name,
                email: body.email,
            },
        )
        .await?;
    Ok(web::Json(UserResponseBody::from(user)))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.users.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}
