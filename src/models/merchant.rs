//! Modelo de Point Marchand (PM)
//!
//! Ubicación física donde están desplegados los TPE. El nombre es único;
//! las coordenadas se corrigen solo por el flujo explícito de corrección.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Grupo reservado que se excluye de los listados de terrain
pub const GROUPE_SOFTPOS: &str = "SOFTPOS";

/// Point marchand con su geolocalización
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pm {
    pub id: i32,
    pub nom_pm: String,
    pub latitude_pm: f64,
    pub longitude_pm: f64,
    pub groupe_pm: Option<String>,
    pub zone_pm: Option<String>,
    pub created_at: DateTime<Utc>,
}
