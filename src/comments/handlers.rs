use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    auth::AuthUser,
    comments::repo::CommentRepo,
    complaints::{repo::ComplaintRepo, services::parse_complaint_id},
    db::StoreError,
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateCommentRequest {
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedCommentResponse {
    pub message: &'static str,
    pub commentid: i64,
}

pub fn comment_routes() -> Router<AppState> {
    Router::new().route("/comments/create/:id", post(create_comment))
}

#[instrument(skip(state, payload))]
pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedCommentResponse>)> {
    let Path(raw) = id?;
    let complaint_id = parse_complaint_id(&raw)?;
    let Json(payload) = payload?;

    if payload.comment.is_empty() {
        return Err(AppError::validation("Comment is required"));
    }

    let exists = state
        .store
        .complaint_exists(complaint_id)
        .await
        .map_err(|e| AppError::internal("Failed to load complaint", e))?;
    if !exists {
        warn!(complaint_id, "comment on unknown complaint");
        return Err(AppError::not_found("Complaint not found"));
    }

    let comment_id = match state
        .store
        .create_comment(complaint_id, &payload.comment, user_id)
        .await
    {
        Ok(id) => id,
        Err(StoreError::ForeignKeyViolation(_)) => {
            return Err(AppError::not_found("Complaint not found"))
        }
        Err(e) => return Err(AppError::internal("Failed to create comment", e)),
    };

    info!(comment_id, complaint_id, user_id, "comment created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedCommentResponse {
            message: "comment created successfully",
            commentid: comment_id,
        }),
    ))
}
