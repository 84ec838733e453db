//! Modelo de Livraison (remise de TPE a despliegue)
//!
//! Una livraison registra la entrega de un lote de terminales; queda
//! "En attente" hasta que un segundo agent la valida, lo que dispara la
//! notificación a los agents de las zonas afectadas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUT_EN_ATTENTE: &str = "En attente";
pub const STATUT_EN_ATTENTE_DEPLOIEMENT: &str = "En attente de déploiement";

/// Livraison de terminales
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Livraison {
    pub id: i32,
    pub numero_livraison: String,
    pub date_livraison: DateTime<Utc>,
    pub statut_livraison: String,
    /// Lista serializada de numéros de série entregados
    pub tpes: String,
    pub agent_saisie_livraison_id: i32,
    pub agent_validateur_livraison_id: Option<i32>,
}

/// Numéro de série individual de una livraison
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TpeLivraison {
    pub id: i32,
    pub sn_tpe_livraison: String,
    pub livraison_id: i32,
}

/// Generar el numéro de livraison único
pub fn generate_numero_livraison() -> String {
    format!("DC-{}", Uuid::new_v4().to_string().to_uppercase())
}

impl Livraison {
    pub fn is_validated(&self) -> bool {
        self.agent_validateur_livraison_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numero_livraison_format() {
        let numero = generate_numero_livraison();
        assert!(numero.starts_with("DC-"));
        assert_eq!(numero.len(), "DC-".len() + 36);
    }
}
