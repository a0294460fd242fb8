use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    categories::repo::{Category, CategoryRepo},
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// Existing clients read the new id from `customerid`.
#[derive(Debug, Serialize)]
pub struct CreatedCategoryResponse {
    pub message: &'static str,
    pub customerid: i64,
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories/create", post(create_category))
        .route("/categories", get(list_categories))
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedCategoryResponse>)> {
    let Json(payload) = payload?;

    if payload.name.is_empty() {
        return Err(AppError::validation("Category name is required"));
    }

    let category = state
        .store
        .create_category(&payload.name)
        .await
        .map_err(|e| AppError::internal("Failed to create category", e))?;

    info!(category_id = category.id, name = %category.name, "category created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedCategoryResponse {
            message: "Category created successfully",
            customerid: category.id,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = state
        .store
        .list_categories()
        .await
        .map_err(|e| AppError::internal("Failed to get categories", e))?;
    Ok(Json(categories))
}
