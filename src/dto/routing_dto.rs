//! DTOs de routing (plans de visites)

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::agent::Agent;
use crate::models::routing::{PmEntry, Routing};

/// Selección del routing aplicable a una visite.
///
/// La decisión la toma la capa API a partir del campo opcional del
/// request; el resolver nunca adivina según el tipo en runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoutingSelector {
    /// Lookup por clave primaria
    Explicit(i32),
    /// Plan par défaut del agent
    UseDefault,
}

impl From<Option<i32>> for RoutingSelector {
    fn from(routing_id: Option<i32>) -> Self {
        match routing_id {
            Some(id) => RoutingSelector::Explicit(id),
            None => RoutingSelector::UseDefault,
        }
    }
}

/// Request para crear un routing
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoutingRequest {
    pub bdm: i32,
    pub agent: i32,

    #[validate(length(min = 1))]
    pub description_routing: String,

    /// Format AAAA-MM-JJ
    #[validate(length(min = 1))]
    pub date_debut_routing: String,

    /// Format AAAA-MM-JJ
    #[validate(length(min = 1))]
    pub date_fin_routing: String,

    #[validate(length(min = 1))]
    pub pm_routing: Vec<PmEntry>,
}

/// Request de lectura por agent
#[derive(Debug, Deserialize)]
pub struct RoutingByCommercialRequest {
    #[serde(rename = "agentId")]
    pub agent_id: i32,
}

/// Request de lectura por BDM
#[derive(Debug, Deserialize)]
pub struct RoutingByBdmRequest {
    #[serde(rename = "bdmId")]
    pub bdm_id: i32,
}

/// Routing con la identidad del agent asignado
#[derive(Debug, Serialize)]
pub struct RoutingWithAgent {
    #[serde(flatten)]
    pub routing: Routing,
    pub agent: Agent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_from_explicit_id() {
        assert_eq!(RoutingSelector::from(Some(7)), RoutingSelector::Explicit(7));
    }

    #[test]
    fn test_selector_from_missing_id() {
        assert_eq!(RoutingSelector::from(None), RoutingSelector::UseDefault);
    }
}
