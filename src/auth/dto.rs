use serde::{Deserialize, Serialize};

/// Request body for user registration. Missing fields decode as empty strings
/// and are rejected by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub userid: i64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}
