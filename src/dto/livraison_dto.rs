//! DTOs de livraisons de TPE

use serde::{Deserialize, Serialize};

use crate::models::livraison::{Livraison, TpeLivraison};

/// Request para registrar una livraison
#[derive(Debug, Deserialize)]
pub struct SaveLivraisonRequest {
    #[serde(rename = "agentSaisieDt")]
    pub agent_saisie: i32,
    /// Numéros de série de los terminales entregados
    pub tpes: Vec<String>,
}

/// Request de validation
#[derive(Debug, Deserialize)]
pub struct ValiderLivraisonRequest {
    #[serde(rename = "agentValidateur")]
    pub agent_validateur: i32,
}

/// Livraison con sus numéros de série
#[derive(Debug, Serialize)]
pub struct LivraisonWithTpes {
    #[serde(flatten)]
    pub livraison: Livraison,
    pub tpe_livraison: Vec<TpeLivraison>,
}
