//! Modelo de Routine (visite terrain)
//!
//! Una routine registra el paso físico de un agent por un point marchand,
//! con el estado observado de cada TPE. Inmutable una vez creada; las
//! filas `tpe_routine` pertenecen exclusivamente a su routine (cascade).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Visite d'un agent chez un point marchand
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Routine {
    pub id: i32,
    pub numero_routine: String,
    pub date_routine: DateTime<Utc>,
    pub point_marchand_routine: String,
    pub veille_concurentielle_routine: Option<String>,
    pub commentaire_routine: Option<String>,
    pub latitude_marchand_routine: f64,
    pub longitude_marchand_routine: f64,
    pub commercial_routine_id: i32,
    pub routing_id: i32,
}

/// Estado observado de un TPE durante una routine
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TpeRoutine {
    pub id: i32,
    pub id_terminal_tpe_routine: String,
    pub etat_tpe_routine: String,
    pub etat_chargeur_tpe_routine: String,
    pub probleme_bancaire: bool,
    pub description_probleme_bancaire: Option<String>,
    pub probleme_mobile: bool,
    pub description_probleme_mobile: Option<String>,
    pub commentaire_tpe_routine: Option<String>,
    pub image_tpe_routine: Option<String>,
    pub routine_id: i32,
}

/// Generar el numéro de visite único
pub fn generate_numero_routine() -> String {
    format!("ROUTINE-{}", Uuid::new_v4().to_string().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numero_routine_format() {
        let numero = generate_numero_routine();
        assert!(numero.starts_with("ROUTINE-"));
        // UUID v4 en mayúsculas, 36 caracteres
        let suffix = &numero["ROUTINE-".len()..];
        assert_eq!(suffix.len(), 36);
        assert_eq!(suffix, suffix.to_uppercase());
    }

    #[test]
    fn test_numero_routine_is_unique() {
        assert_ne!(generate_numero_routine(), generate_numero_routine());
    }
}
