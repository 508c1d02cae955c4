//! Port for comment persistence.

use async_trait::async_trait;

use crate::domain::item::{Comment, CommentRecord, NewComment};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "comment repository query failed: {message}",
    }
}

/// Storage and retrieval of item comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Persist a new comment and return it with its assigned id.
    async fn insert(&self, comment: NewComment) -> Result<Comment, CommentRepositoryError>;

    /// Comments on one item, joined with their authors' names.
    async fn list_for_item(&self, item_id: i64)
        -> Result<Vec<CommentRecord>, CommentRepositoryError>;
}
