//! DTOs del flujo de routines (visites terrain)
//!
//! Los nombres de campos JSON conservan el contrato histórico de la app
//! móvil (mezcla de camelCase y snake_case).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::routine::{Routine, TpeRoutine};

/// Request para registrar una visite
#[derive(Debug, Deserialize, Validate)]
pub struct MakeRoutineRequest {
    #[serde(rename = "commercialId")]
    pub commercial_id: i32,

    #[serde(rename = "pointMarchand")]
    #[validate(length(min = 1))]
    pub point_marchand: String,

    #[serde(rename = "veilleConcurrentielle")]
    pub veille_concurrentielle: Option<String>,

    #[serde(rename = "tpeList")]
    #[validate(length(min = 1))]
    pub tpe_list: Vec<TpeRoutineEntry>,

    #[serde(rename = "latitudeReel")]
    pub latitude_reel: f64,

    #[serde(rename = "longitudeReel")]
    pub longitude_reel: f64,

    pub routing_id: Option<i32>,

    pub commentaire_routine: Option<String>,
}

/// Estado de un TPE observado durante la visite
#[derive(Debug, Deserialize, Serialize)]
pub struct TpeRoutineEntry {
    #[serde(rename = "idTerminal")]
    pub id_terminal: String,

    #[serde(rename = "etatTpe")]
    pub etat_tpe: String,

    #[serde(rename = "etatChargeur")]
    pub etat_chargeur: String,

    #[serde(rename = "problemeBancaire")]
    pub probleme_bancaire: bool,

    #[serde(rename = "descriptionProblemeBancaire")]
    pub description_probleme_bancaire: Option<String>,

    #[serde(rename = "problemeMobile")]
    pub probleme_mobile: bool,

    #[serde(rename = "descriptionProblemeMobile")]
    pub description_probleme_mobile: Option<String>,

    #[serde(rename = "commentaire_tpe_routine")]
    pub commentaire: Option<String>,

    /// Imagen en base64, subida al hébergeur antes de persistir
    pub image_tpe_routine: Option<String>,
}

/// Routine persistida con sus TPE anidados
#[derive(Debug, Serialize)]
pub struct RoutineWithTpes {
    #[serde(flatten)]
    pub routine: Routine,
    pub tpe_routine: Vec<TpeRoutine>,
}

/// Request de lectura por commercial
#[derive(Debug, Deserialize)]
pub struct ByCommercialRequest {
    #[serde(rename = "agentId")]
    pub agent_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_routine_request_field_names() {
        let body = r#"{
            "commercialId": 11,
            "pointMarchand": "CHINA MALL VGE",
            "tpeList": [{
                "idTerminal": "T-889",
                "etatTpe": "FONCTIONNEL",
                "etatChargeur": "BON",
                "problemeBancaire": false,
                "problemeMobile": true,
                "descriptionProblemeMobile": "Orange Money indisponible"
            }],
            "latitudeReel": 5.3268,
            "longitudeReel": -4.0227,
            "routing_id": 3
        }"#;

        let request: MakeRoutineRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.commercial_id, 11);
        assert_eq!(request.point_marchand, "CHINA MALL VGE");
        assert_eq!(request.tpe_list.len(), 1);
        assert_eq!(request.routing_id, Some(3));
        assert!(request.tpe_list[0].probleme_mobile);
        assert!(request.tpe_list[0].image_tpe_routine.is_none());
    }

    #[test]
    fn test_empty_tpe_list_fails_validation() {
        use validator::Validate;

        let request = MakeRoutineRequest {
            commercial_id: 11,
            point_marchand: "CHINA MALL VGE".to_string(),
            veille_concurrentielle: None,
            tpe_list: vec![],
            latitude_reel: 5.3268,
            longitude_reel: -4.0227,
            routing_id: None,
            commentaire_routine: None,
        };
        assert!(request.validate().is_err());
    }
}
