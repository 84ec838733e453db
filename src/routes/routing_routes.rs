//! Rutas de routings (plans de visites)

use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::routing_controller::RoutingController;
use crate::dto::common::ApiResponse;
use crate::dto::routing_dto::{
    CreateRoutingRequest, RoutingByBdmRequest, RoutingByCommercialRequest, RoutingWithAgent,
};
use crate::models::routing::Routing;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_routing_router() -> Router<AppState> {
    Router::new()
        .route("/createRouting", post(create_routing))
        .route("/getRoutingByCommercial", post(get_routing_by_commercial))
        .route("/getAllRoutingsByBdm", post(get_all_routings_by_bdm))
}

async fn create_routing(
    State(state): State<AppState>,
    Json(request): Json<CreateRoutingRequest>,
) -> Result<Json<ApiResponse<Routing>>, AppError> {
    let controller = RoutingController::new(&state);
    let response = controller.create_routing(request).await?;
    Ok(Json(response))
}

async fn get_routing_by_commercial(
    State(state): State<AppState>,
    Json(request): Json<RoutingByCommercialRequest>,
) -> Result<Json<Vec<Routing>>, AppError> {
    let controller = RoutingController::new(&state);
    let response = controller.get_routings_by_commercial(request.agent_id).await?;
    Ok(Json(response))
}

async fn get_all_routings_by_bdm(
    State(state): State<AppState>,
    Json(request): Json<RoutingByBdmRequest>,
) -> Result<Json<Vec<RoutingWithAgent>>, AppError> {
    let controller = RoutingController::new(&state);
    let response = controller.get_routings_by_bdm(request.bdm_id).await?;
    Ok(Json(response))
}
