//! Rutas de routines (visites terrain)

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::controllers::routine_controller::RoutineController;
use crate::dto::common::ApiResponse;
use crate::dto::routine_dto::{ByCommercialRequest, MakeRoutineRequest, RoutineWithTpes};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_routine_router() -> Router<AppState> {
    Router::new()
        .route("/makeRoutine", post(make_routine))
        .route("/routines", get(get_routines))
        .route("/getRoutineByCommercial", post(get_routine_by_commercial))
        .route("/importBase64File", post(import_base64_file))
}

async fn make_routine(
    State(state): State<AppState>,
    Json(request): Json<MakeRoutineRequest>,
) -> Result<Json<ApiResponse<RoutineWithTpes>>, AppError> {
    let controller = RoutineController::new(&state);
    let response = controller.make_routine(request).await?;
    Ok(Json(response))
}

async fn get_routines(
    State(state): State<AppState>,
) -> Result<Json<Vec<RoutineWithTpes>>, AppError> {
    let controller = RoutineController::new(&state);
    let response = controller.get_routines().await?;
    Ok(Json(response))
}

async fn get_routine_by_commercial(
    State(state): State<AppState>,
    Json(request): Json<ByCommercialRequest>,
) -> Result<Json<Vec<RoutineWithTpes>>, AppError> {
    let controller = RoutineController::new(&state);
    let response = controller
        .get_routines_by_commercial(request.agent_id)
        .await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct ImportImageRequest {
    image: String,
}

/// Relais de subida de imagen: devuelve la URL durable del hébergeur
async fn import_base64_file(
    State(state): State<AppState>,
    Json(request): Json<ImportImageRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let host = state.image_host.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("L'hébergeur d'images n'est pas configuré".to_string())
    })?;

    let image_url = host.upload_base64(&request.image).await?;
    Ok(Json(serde_json::json!({ "imageUrl": image_url })))
}
