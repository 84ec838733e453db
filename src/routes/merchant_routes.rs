//! Rutas de points marchands

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::merchant_controller::MerchantController;
use crate::dto::common::ApiResponse;
use crate::dto::merchant_dto::{
    NearbyMerchantsRequest, SerialNumberRow, SnByMerchantRequest, UpdateMerchantRequest,
};
use crate::models::merchant::Pm;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_merchant_router() -> Router<AppState> {
    Router::new()
        .route("/pms", get(get_merchants))
        .route("/nearby", post(get_nearby_merchants))
        .route("/updateMerchant", post(create_merchant))
        .route("/getSnByPointMarchand", post(get_serials_by_merchant))
}

async fn get_merchants(State(state): State<AppState>) -> Result<Json<Vec<Pm>>, AppError> {
    let controller = MerchantController::new(&state);
    let response = controller.get_merchants().await?;
    Ok(Json(response))
}

async fn get_nearby_merchants(
    State(state): State<AppState>,
    Json(request): Json<NearbyMerchantsRequest>,
) -> Result<Json<Vec<Pm>>, AppError> {
    let controller = MerchantController::new(&state);
    let response = controller.get_nearby_merchants(request).await?;
    Ok(Json(response))
}

async fn create_merchant(
    State(state): State<AppState>,
    Json(request): Json<UpdateMerchantRequest>,
) -> Result<Json<ApiResponse<Pm>>, AppError> {
    let controller = MerchantController::new(&state);
    let response = controller.create_merchant(request).await?;
    Ok(Json(response))
}

async fn get_serials_by_merchant(
    State(state): State<AppState>,
    Json(request): Json<SnByMerchantRequest>,
) -> Result<Json<Vec<SerialNumberRow>>, AppError> {
    let controller = MerchantController::new(&state);
    let response = controller.get_serials_by_merchant(request).await?;
    Ok(Json(response))
}
