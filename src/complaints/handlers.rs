use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::AuthUser,
    complaints::{
        dto::{ComplaintResponse, CreateComplaintRequest, EditComplaintRequest, ListComplaintsQuery},
        repo::ComplaintRepo,
        repo_types::Complaint,
        services::{build_filter, create_complaint, edit_complaint, parse_complaint_id},
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub fn complaint_routes() -> Router<AppState> {
    Router::new()
        .route("/complaints/create", post(create))
        .route("/complaints/edit/:id", put(edit))
        .route("/complaints", get(list))
        .route("/complaints/:id", get(get_by_id))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateComplaintRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ComplaintResponse>)> {
    let Json(payload) = payload?;
    let id = create_complaint(state.store.as_ref(), payload, user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ComplaintResponse {
            message: "Complaint created successfully",
            complaintid: id,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn edit(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<EditComplaintRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ComplaintResponse>)> {
    let Path(raw) = id?;
    let id = parse_complaint_id(&raw)?;
    let Json(payload) = payload?;
    edit_complaint(state.store.as_ref(), id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ComplaintResponse {
            message: "Complaint updated successfully",
            complaintid: id,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListComplaintsQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Complaint>>> {
    let Query(query) = query?;
    let filter = build_filter(&query)?;
    let complaints = state
        .store
        .list_complaints(&filter)
        .await
        .map_err(|e| AppError::internal("Failed to get complaints", e))?;
    Ok(Json(complaints))
}

#[instrument(skip(state))]
pub async fn get_by_id(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<Complaint>> {
    let Path(raw) = id?;
    let id = parse_complaint_id(&raw)?;
    state
        .store
        .get_complaint(id)
        .await
        .map_err(|e| AppError::internal("Failed to get complaint", e))?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Complaint not found"))
}
