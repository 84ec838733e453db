//! Rutas de agents y codes d'autorisation

use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::agent_controller::AgentController;
use crate::dto::agent_dto::{
    GenerateAuthCodeRequest, MyAgentsRequest, ProfileRequest, ValidateAuthCodeRequest,
};
use crate::dto::common::ApiResponse;
use crate::models::agent::Agent;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_agent_router() -> Router<AppState> {
    Router::new()
        .route("/generateAuthCode", post(generate_auth_code))
        .route("/validateAuthCode", post(validate_auth_code))
        .route("/getMyAgents", post(get_my_agents))
        .route("/getProfile", post(get_profile))
}

async fn generate_auth_code(
    State(state): State<AppState>,
    Json(request): Json<GenerateAuthCodeRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AgentController::new(&state);
    let response = controller.generate_auth_code(request).await?;
    Ok(Json(response))
}

async fn validate_auth_code(
    State(state): State<AppState>,
    Json(request): Json<ValidateAuthCodeRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AgentController::new(&state);
    let response = controller.validate_auth_code(request).await?;
    Ok(Json(response))
}

async fn get_my_agents(
    State(state): State<AppState>,
    Json(request): Json<MyAgentsRequest>,
) -> Result<Json<Vec<Agent>>, AppError> {
    let controller = AgentController::new(&state);
    let response = controller.get_my_agents(request).await?;
    Ok(Json(response))
}

async fn get_profile(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<Agent>, AppError> {
    let controller = AgentController::new(&state);
    let response = controller.get_profile(request).await?;
    Ok(Json(response))
}
