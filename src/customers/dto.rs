use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateCustomerRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedCustomerResponse {
    pub message: &'static str,
    pub customerid: i64,
}
