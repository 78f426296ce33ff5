//! User-related models

use serde::{Deserialize, Serialize};

/// User profile as returned by the server (no password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub lastname: String,
    pub role: i8,
}

impl PublicUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.lastname).trim().to_string()
    }
}

/// Credentials for `/user/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Account registration payload for `/user/signup`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub name: String,
    pub lastname: String,
    pub password: String,
}
