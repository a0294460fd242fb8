use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    customers::{
        dto::{CreateCustomerRequest, CreatedCustomerResponse},
        repo::CustomerRepo,
        repo_types::Customer,
    },
    db::{name_fits, StoreError, MAX_NAME_CHARS},
    error::{AppError, AppResult},
    state::AppState,
};

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/customers/create", post(create_customer))
        .route("/customers", get(list_customers))
}

#[instrument(skip(state, payload))]
pub async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedCustomerResponse>)> {
    let Json(payload) = payload?;

    if payload.name.is_empty() {
        return Err(AppError::validation("Customer name is required"));
    }
    if !name_fits(&payload.name) {
        return Err(customer_name_too_long());
    }

    let customer = match state.store.create_customer(&payload.name).await {
        Ok(c) => c,
        Err(StoreError::UniqueViolation(_)) => {
            warn!(name = %payload.name, "customer already exists");
            return Err(AppError::conflict("Customer already exists"));
        }
        Err(e) => return Err(AppError::internal("Failed to create customer", e)),
    };

    info!(customer_id = customer.id, name = %customer.name, "customer created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedCustomerResponse {
            message: "Customer created successfully",
            customerid: customer.id,
        }),
    ))
}

pub(crate) fn customer_name_too_long() -> AppError {
    AppError::validation(format!(
        "Customer name must be at most {MAX_NAME_CHARS} characters"
    ))
}

#[instrument(skip(state))]
pub async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let customers = state
        .store
        .list_customers()
        .await
        .map_err(|e| AppError::internal("Failed to get customers", e))?;
    Ok(Json(customers))
}
