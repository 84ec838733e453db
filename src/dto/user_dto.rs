//! DTOs de cuentas de acceso

use serde::{Deserialize, Serialize};

/// Request de inscription
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub agent: i32,
    pub role: i32,
}

/// Request de connexion
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response de connexion (sin password)
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: i32,
    pub username_user: String,
    pub agent_user_id: i32,
    pub role_user_id: i32,
    pub token: String,
}
