//! Modelo de Agent (commercial de terrain)
//!
//! Mapea a las tablas `agent`, `bdm` y `zone_commerciale` del schema
//! PostgreSQL. Un agent depende de un BDM (superviseur) y de una zona
//! comercial; el code d'autorisation es de un solo uso.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Agent commercial de terrain
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Agent {
    pub id: i32,
    pub nom_agent: String,
    pub prenom_agent: String,
    pub numero_telephone_agent: String,
    pub photo_profil_agent: Option<String>,
    pub responsable_agent_id: i32,
    pub zone_commerciale_id: Option<i32>,
    pub code_authorisation_agent: Option<String>,
    pub fcm_token_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    /// Nom complet para reporting y notificaciones
    pub fn display_name(&self) -> String {
        format!("{} {}", self.nom_agent, self.prenom_agent)
    }
}

/// Superviseur (BDM) responsable de un grupo de agents
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bdm {
    pub id: i32,
    pub nom_bdm: String,
    pub prenom_bdm: String,
    pub numero_telephone_bdm: String,
    pub created_at: DateTime<Utc>,
}

impl Bdm {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.nom_bdm, self.prenom_bdm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let agent = Agent {
            id: 11,
            nom_agent: "KOUASSI".to_string(),
            prenom_agent: "Jean".to_string(),
            numero_telephone_agent: "0708091011".to_string(),
            photo_profil_agent: None,
            responsable_agent_id: 2,
            zone_commerciale_id: Some(1),
            code_authorisation_agent: None,
            fcm_token_agent: None,
            created_at: Utc::now(),
        };
        assert_eq!(agent.display_name(), "KOUASSI Jean");
    }
}
