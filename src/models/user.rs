//! Modelo de Users (cuentas de acceso)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Rol privilegiado excluido de los reportes de dirección
pub const ROLE_DIRECTION: i32 = 1;

/// Cuenta de acceso ligada a un agent
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username_user: String,
    #[serde(skip_serializing)]
    pub password_user: String,
    pub agent_user_id: i32,
    pub role_user_id: i32,
    pub created_at: DateTime<Utc>,
}
