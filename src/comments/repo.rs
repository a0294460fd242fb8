use async_trait::async_trait;

use crate::{
    comments::repo_types::{Comment, CommentRow},
    db::{PgStore, StoreResult},
};

#[async_trait]
pub trait CommentRepo: Send + Sync {
    /// Append a comment. An unknown complaint surfaces as
    /// `StoreError::ForeignKeyViolation`.
    async fn create_comment(&self, complaint_id: i64, text: &str, author_id: i64)
        -> StoreResult<i64>;

    /// Comments of the given complaints, newest first.
    async fn list_comments(&self, complaint_ids: &[i64]) -> StoreResult<Vec<Comment>>;
}

#[async_trait]
impl CommentRepo for PgStore {
    async fn create_comment(
        &self,
        complaint_id: i64,
        text: &str,
        author_id: i64,
    ) -> StoreResult<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO comments (comment, complaint_id, created_by_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(text)
        .bind(complaint_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn list_comments(&self, complaint_ids: &[i64]) -> StoreResult<Vec<Comment>> {
        if complaint_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT cm.id, cm.comment, cm.complaint_id, cm.created_at, cm.created_by_id,
                   u.name AS author_name, u.email AS author_email,
                   u.created_at AS author_created_at
              FROM comments cm
              JOIN users u ON u.id = cm.created_by_id
             WHERE cm.complaint_id = ANY($1)
             ORDER BY cm.created_at DESC, cm.id DESC
            "#,
        )
        .bind(complaint_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
