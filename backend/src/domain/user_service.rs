//! User domain service: signup validation, email uniqueness, partial update.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{NewUser, User, UserDraft, UserPatch};
use crate::domain::Error;

/// Driving port for user operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    async fn create(&self, draft: UserDraft) -> Result<User, Error>;

    async fn update(&self, user_id: i64, patch: UserPatch) -> Result<User, Error>;

    async fn get(&self, user_id: i64) -> Result<User, Error>;

    async fn list(&self) -> Result<Vec<User>, Error>;

    async fn delete(&self, user_id: i64) -> Result<(), Error>;
}

/// Repository-backed [`UserService`] implementation.
#[derive(Clone)]
pub struct UserServiceImpl<R> {
    users: Arc<R>,
}

impl<R> UserServiceImpl<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

fn map_repo_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::Duplicate { message } => Error::conflict(message),
    }
}

fn validate_email(email: &str) -> Result<(), Error> {
    if email.trim().is_empty() {
        return Err(Error::invalid_request("email must not be blank"));
    }
    if !email.contains('@') {
        return Err(Error::invalid_request("email is malformed"));
    }
    Ok(())
}

fn validate_draft(draft: UserDraft) -> Result<NewUser, Error> {
    let email = draft
        .email
        .ok_or_else(|| Error::invalid_request("email must not be blank"))?;
    validate_email(&email)?;
    let name = draft
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| Error::invalid_request("name must not be blank"))?;
    Ok(NewUser { name, email })
}

impl<R> UserServiceImpl<R>
where
    R: UserRepository,
{
    async fn require_user(&self, user_id: i64) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}

#[async_trait]
impl<R> UserService for UserServiceImpl<R>
where
    R: UserRepository,
{
    async fn create(&self, draft: UserDraft) -> Result<User, Error> {
        let new_user = validate_draft(draft)?;

        // The unique index is the backstop; this check produces the friendlier
        // message in the common case.
        if self
            .users
            .find_by_email(&new_user.email)
            .await
            .map_err(map_repo_error)?
            .is_some()
        {
            return Err(Error::conflict(format!(
                "a user with email {} already exists",
                new_user.email
            )));
        }

        self.users.insert(new_user).await.map_err(map_repo_error)
    }

    async fn update(&self, user_id: i64, patch: UserPatch) -> Result<User, Error> {
        let existing = self.require_user(user_id).await?;

        if patch.is_empty() {
            return Ok(existing);
        }

        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(Error::invalid_request("name must not be blank"));
            }
        }
        if let Some(email) = &patch.email {
            validate_email(email)?;
            if *email != existing.email
                && self
                    .users
                    .email_taken_by_other(email, user_id)
                    .await
                    .map_err(map_repo_error)?
            {
                return Err(Error::conflict(format!(
                    "a user with email {email} already exists"
                )));
            }
        }

        self.users
            .update(user_id, patch)
            .await
            .map_err(map_repo_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }

    async fn get(&self, user_id: i64) -> Result<User, Error> {
        self.require_user(user_id).await
    }

    async fn list(&self) -> Result<Vec<User>, Error> {
        self.users.list_all().await.map_err(map_repo_error)
    }

    async fn delete(&self, user_id: i64) -> Result<(), Error> {
        let deleted = self.users.delete(user_id).await.map_err(map_repo_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {user_id} not found")))
        }
    }
}
