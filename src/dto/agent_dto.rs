//! DTOs de agents y codes d'autorisation

use serde::Deserialize;

/// Request de génération de code d'autorisation
#[derive(Debug, Deserialize)]
pub struct GenerateAuthCodeRequest {
    #[serde(rename = "agentID")]
    pub agent_id: i32,
    #[serde(rename = "respoId")]
    pub respo_id: i32,
}

/// Request de validation de code
#[derive(Debug, Deserialize)]
pub struct ValidateAuthCodeRequest {
    #[serde(rename = "agentID")]
    pub agent_id: i32,
    pub code: String,
}

/// Request de la liste d'agents d'un BDM
#[derive(Debug, Deserialize)]
pub struct MyAgentsRequest {
    #[serde(rename = "bdmId")]
    pub bdm_id: i32,
}

/// Request de profil agent
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(rename = "agentId")]
    pub agent_id: i32,
}
