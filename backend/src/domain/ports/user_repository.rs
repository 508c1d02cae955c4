//! Port for user persistence.

use async_trait::async_trait;

use crate::domain::user::{NewUser, User, UserPatch};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// The email unique index rejected the write.
        Duplicate { message: String } =>
            "user already exists: {message}",
    }
}

/// Storage and retrieval of users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user and return it with its assigned id.
    async fn insert(&self, user: NewUser) -> Result<User, UserRepositoryError>;

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, UserRepositoryError>;

    async fn list_all(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Apply a partial update; `None` fields are left untouched. Returns the
    /// updated user, or `None` when no such user exists. Callers must not
    /// pass an empty patch.
    async fn update(&self, user_id: i64, patch: UserPatch)
        -> Result<Option<User>, UserRepositoryError>;

    /// Returns true when a row was deleted.
    async fn delete(&self, user_id: i64) -> Result<bool, UserRepositoryError>;

    async fn exists(&self, user_id: i64) -> Result<bool, UserRepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    /// True when another user (id differs) already holds this email.
    async fn email_taken_by_other(
        &self,
        email: &str,
        user_id: i64,
    ) -> Result<bool, UserRepositoryError>;
}
