use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
        jwt::JwtKeys,
        password::{burn_verification, hash_password, verify_password},
        repo::UserRepo,
    },
    db::{name_fits, StoreError, MAX_NAME_CHARS},
    error::{AppError, AppResult},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(payload) = payload?;

    if payload.name.is_empty() || payload.password.is_empty() {
        warn!("register without name or password");
        return Err(AppError::validation("Username and password are required"));
    }
    if !name_fits(&payload.name) {
        warn!("register with over-long name");
        return Err(AppError::validation(format!(
            "Username must be at most {MAX_NAME_CHARS} characters"
        )));
    }

    let hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal("Failed to hash password", e))?;

    let user = match state
        .store
        .create_user(&payload.name, &payload.email, &hash)
        .await
    {
        Ok(u) => u,
        Err(StoreError::UniqueViolation(_)) => {
            warn!(email = %payload.email, "email already registered");
            return Err(AppError::conflict("Email already exists"));
        }
        Err(e) => return Err(AppError::internal("Failed to create user", e)),
    };

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully",
            userid: user.id,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(payload) = payload?;

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let user = match state.store.find_user_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            burn_verification(&payload.password);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }
        Err(e) => return Err(AppError::internal("Failed to retrieve user", e)),
    };

    let ok = verify_password(&payload.password, &user.password)
        .map_err(|e| AppError::internal("Failed to verify password", e))?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = JwtKeys::from_ref(&state)
        .sign(&user)
        .map_err(|e| AppError::internal("Failed to sign token", e))?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse { token }))
}
