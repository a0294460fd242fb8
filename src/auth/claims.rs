use serde::{Deserialize, Serialize};

/// JWT payload issued on login. Field names are part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String, // user display name
    pub userid: i64,      // user ID
    pub email: String,
    pub exp: usize, // expires at (unix timestamp)
}
