//! Modelo de Routing (plan de visites)
//!
//! Un routing liga un agent a una lista ordenada de points marchands a
//! visitar dentro de una ventana [date_debut, date_fin]. La lista se
//! persiste serializada en JSON (`[{"nom_pm": …}, …]`), inmutable después
//! de la creación.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Marcador reservado del plan par défaut de cada agent
pub const DEFAULT_ROUTING_DESCRIPTION: &str = "ROUTING PAR DEFAUT";

/// Plan de visites asignado por un BDM
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Routing {
    pub id: i32,
    pub description_routing: String,
    pub date_debut_routing: DateTime<Utc>,
    pub date_fin_routing: DateTime<Utc>,
    /// Lista serializada de points marchands objetivo
    pub pm_routing: String,
    pub agent_routing_id: i32,
    pub bdm_routing_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Entrada de la lista de points marchands de un routing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PmEntry {
    // La app móvil histórica enviaba `nom_Pm`
    #[serde(alias = "nom_Pm")]
    pub nom_pm: String,
}

impl Routing {
    pub fn is_default(&self) -> bool {
        self.description_routing == DEFAULT_ROUTING_DESCRIPTION
    }

    /// Parsear la lista embebida de points marchands.
    ///
    /// Una lista malformada no aborta el reporting: contribuye vacío y
    /// queda el warning en los logs.
    pub fn parse_pm_list(&self) -> Vec<PmEntry> {
        match serde_json::from_str::<Vec<PmEntry>>(&self.pm_routing) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!(
                    "⚠️ pm_routing malformado en routing {} ('{}'): {}",
                    self.id,
                    self.pm_routing,
                    e
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routing_with(pm_routing: &str) -> Routing {
        Routing {
            id: 1,
            description_routing: "SEMAINE 23".to_string(),
            date_debut_routing: Utc::now(),
            date_fin_routing: Utc::now(),
            pm_routing: pm_routing.to_string(),
            agent_routing_id: 11,
            bdm_routing_id: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_pm_list() {
        let routing =
            routing_with(r#"[{"nom_pm":"CHINA MALL VGE"},{"nom_pm":"CITY CENTER"}]"#);
        let entries = routing.parse_pm_list();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].nom_pm, "CHINA MALL VGE");
    }

    #[test]
    fn test_parse_pm_list_accepts_legacy_field_name() {
        let routing = routing_with(r#"[{"nom_Pm":"CAP SUD"}]"#);
        let entries = routing.parse_pm_list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].nom_pm, "CAP SUD");
    }

    #[test]
    fn test_parse_pm_list_tolerates_garbage() {
        assert!(routing_with("pas du json").parse_pm_list().is_empty());
        assert!(routing_with("{}").parse_pm_list().is_empty());
    }

    #[test]
    fn test_is_default() {
        let mut routing = routing_with("[]");
        assert!(!routing.is_default());
        routing.description_routing = DEFAULT_ROUTING_DESCRIPTION.to_string();
        assert!(routing.is_default());
    }
}
