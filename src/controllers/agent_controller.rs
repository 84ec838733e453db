//! Gestión de agents y codes d'autorisation

use rand::Rng;

use crate::dto::agent_dto::{
    GenerateAuthCodeRequest, MyAgentsRequest, ProfileRequest, ValidateAuthCodeRequest,
};
use crate::dto::common::ApiResponse;
use crate::models::agent::Agent;
use crate::repositories::agent_repository::AgentRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct AgentController {
    agents: AgentRepository,
}

impl AgentController {
    pub fn new(state: &AppState) -> Self {
        Self {
            agents: AgentRepository::new(state.pool.clone()),
        }
    }

    /// Code de un solo uso, emitido por un responsable
    pub async fn generate_auth_code(
        &self,
        request: GenerateAuthCodeRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        let agent = self
            .agents
            .find_by_id(request.agent_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cet agent n'existe pas".to_string()))?;
        self.agents
            .find_bdm_by_id(request.respo_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ce responsable n'existe pas".to_string()))?;

        let code = rand::thread_rng().gen_range(1000..10000);
        self.agents
            .set_auth_code(agent.id, &code.to_string())
            .await?;

        log::info!("🔐 Code d'autorisation generado para el agent {}", agent.id);

        Ok(ApiResponse::message_only(
            "Code généré avec succès".to_string(),
        ))
    }

    pub async fn validate_auth_code(
        &self,
        request: ValidateAuthCodeRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        let agent = self
            .agents
            .find_by_id(request.agent_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cet agent n'existe pas".to_string()))?;

        match agent.code_authorisation_agent.as_deref() {
            Some(code) if code == request.code => {
                Ok(ApiResponse::message_only("Code validé".to_string()))
            }
            _ => Err(AppError::Unauthorized("Code invalide".to_string())),
        }
    }

    pub async fn get_my_agents(&self, request: MyAgentsRequest) -> Result<Vec<Agent>, AppError> {
        self.agents
            .find_bdm_by_id(request.bdm_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ce BDM n'existe pas".to_string()))?;

        let agents = self.agents.find_by_bdm(request.bdm_id).await?;
        if agents.is_empty() {
            return Err(AppError::NotFound(
                "Vous n'avez pas encore d'agent commercial".to_string(),
            ));
        }
        Ok(agents)
    }

    pub async fn get_profile(&self, request: ProfileRequest) -> Result<Agent, AppError> {
        self.agents
            .find_by_id(request.agent_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cet agent n'existe pas".to_string()))
    }
}
