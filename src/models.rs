use serde::{Deserialize, Serialize};

// Used when a request carries no usable identifier
pub const UNKNOWN_IDENTIFIER: &str = "unknown";

// Login form body
#[derive(Deserialize, Clone)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, Clone)]
pub struct LoginResponse {
    pub success: bool,
    pub email: String,
}

// Query for the status endpoint
#[derive(Deserialize, Clone)]
pub struct StatusQuery {
    #[serde(default)]
    pub email: String,
}

// Key the limiter throttles on: trimmed, lower-cased email
pub fn identifier_for(email: &str) -> String {
    let email = email.trim();
    if email.is_empty() {
        UNKNOWN_IDENTIFIER.to_string()
    } else {
        email.to_lowercase()
    }
}
