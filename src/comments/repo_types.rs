use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::auth::repo_types::PublicUser;

/// A note on a complaint together with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: i64,
    pub comment: String,
    pub complaint_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub created_by_id: i64,
    pub created_by: PublicUser,
}

#[derive(Debug, FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub comment: String,
    pub complaint_id: i64,
    pub created_at: OffsetDateTime,
    pub created_by_id: i64,
    pub author_name: String,
    pub author_email: String,
    pub author_created_at: OffsetDateTime,
}

impl From<CommentRow> for Comment {
    fn from(r: CommentRow) -> Self {
        Self {
            id: r.id,
            comment: r.comment,
            complaint_id: r.complaint_id,
            created_at: r.created_at,
            created_by_id: r.created_by_id,
            created_by: PublicUser {
                id: r.created_by_id,
                name: r.author_name,
                email: r.author_email,
                created_at: r.author_created_at,
            },
        }
    }
}
