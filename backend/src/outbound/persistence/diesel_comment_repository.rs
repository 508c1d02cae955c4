//! PostgreSQL-backed [`CommentRepository`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::item::{Comment, CommentRecord, NewComment};
use crate::domain::ports::{CommentRepository, CommentRepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CommentRow, NewCommentRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

/// Diesel-backed implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> CommentRepositoryError {
    map_pool_error(error, CommentRepositoryError::connection)
}

fn map_read(error: diesel::result::Error) -> CommentRepositoryError {
    map_diesel_error(
        error,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::insert_into(comments::table)
            .values(NewCommentRow {
                text: &comment.text,
                item_id: comment.item_id,
                author_id: comment.author_id,
                created: comment.created,
            })
            .returning(CommentRow::as_returning())
            .get_result::<CommentRow>(&mut conn)
            .await
            .map(Comment::from)
            .map_err(map_read)
    }

    async fn list_for_item(
        &self,
        item_id: i64,
    ) -> Result<Vec<CommentRecord>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows = comments::table
            .inner_join(users::table)
            .filter(comments::item_id.eq(item_id))
            .order(comments::created.asc())
            .select((CommentRow::as_select(), UserRow::as_select()))
            .load::<(CommentRow, UserRow)>(&mut conn)
            .await
            .map_err(map_read)?;

        Ok(rows
            .into_iter()
            .map(|(comment, author)| CommentRecord {
                comment: Comment::from(comment),
                author_name: author.name,
            })
            .collect())
    }
}
