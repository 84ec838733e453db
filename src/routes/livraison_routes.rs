//! Rutas de livraisons de TPE

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::livraison_controller::LivraisonController;
use crate::dto::common::ApiResponse;
use crate::dto::livraison_dto::{
    LivraisonWithTpes, SaveLivraisonRequest, ValiderLivraisonRequest,
};
use crate::models::livraison::Livraison;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_livraison_router() -> Router<AppState> {
    Router::new()
        .route("/", post(save_livraison))
        .route("/", get(get_livraisons))
        .route("/:id", get(get_livraison))
        .route("/:id/valider", put(valider_livraison))
}

async fn save_livraison(
    State(state): State<AppState>,
    Json(request): Json<SaveLivraisonRequest>,
) -> Result<Json<ApiResponse<LivraisonWithTpes>>, AppError> {
    let controller = LivraisonController::new(&state);
    let response = controller.save_livraison(request).await?;
    Ok(Json(response))
}

async fn get_livraisons(
    State(state): State<AppState>,
) -> Result<Json<Vec<Livraison>>, AppError> {
    let controller = LivraisonController::new(&state);
    let response = controller.get_livraisons().await?;
    Ok(Json(response))
}

async fn get_livraison(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<LivraisonWithTpes>, AppError> {
    let controller = LivraisonController::new(&state);
    let response = controller.get_livraison(id).await?;
    Ok(Json(response))
}

async fn valider_livraison(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ValiderLivraisonRequest>,
) -> Result<Json<ApiResponse<Livraison>>, AppError> {
    let controller = LivraisonController::new(&state);
    let response = controller.valider_livraison(id, request).await?;
    Ok(Json(response))
}
