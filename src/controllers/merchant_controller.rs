//! Gestión de points marchands

use crate::dto::common::ApiResponse;
use crate::dto::merchant_dto::{
    NearbyMerchantsRequest, SerialNumberRow, SnByMerchantRequest, UpdateMerchantRequest,
};
use crate::models::merchant::Pm;
use crate::repositories::merchant_repository::MerchantRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::geo::calculate_distance;
use crate::utils::validation::{require_not_empty, validate_coordinates};

pub struct MerchantController {
    merchants: MerchantRepository,
    proximity_threshold_m: f64,
}

impl MerchantController {
    pub fn new(state: &AppState) -> Self {
        Self {
            merchants: MerchantRepository::new(state.pool.clone()),
            proximity_threshold_m: state.config.proximity_threshold_m,
        }
    }

    pub async fn get_merchants(&self) -> Result<Vec<Pm>, AppError> {
        let pms = self.merchants.find_all_deployable().await?;
        if pms.is_empty() {
            return Err(AppError::NotFound("Aucun point marchand trouvé".to_string()));
        }
        Ok(pms)
    }

    /// Points marchands dentro del radio configurado alrededor del
    /// teléfono del agent
    pub async fn get_nearby_merchants(
        &self,
        request: NearbyMerchantsRequest,
    ) -> Result<Vec<Pm>, AppError> {
        validate_coordinates(request.latitude_telephone, request.longitude_telephone)?;

        let pms = self.merchants.find_all_deployable().await?;
        let nearby: Vec<Pm> = pms
            .into_iter()
            .filter(|pm| {
                let distance = calculate_distance(
                    request.latitude_telephone,
                    request.longitude_telephone,
                    pm.latitude_pm,
                    pm.longitude_pm,
                );
                distance <= self.proximity_threshold_m
            })
            .collect();

        if nearby.is_empty() {
            return Err(AppError::NotFound(
                "Aucun point marchand trouvé à proximité".to_string(),
            ));
        }
        Ok(nearby)
    }

    /// Création explícita (corrección de coordenadas del terrain)
    pub async fn create_merchant(
        &self,
        request: UpdateMerchantRequest,
    ) -> Result<ApiResponse<Pm>, AppError> {
        require_not_empty(&request.pm, "Tous les champs sont requis")?;
        validate_coordinates(request.latitude, request.longitude)?;

        if self.merchants.exists_by_name(&request.pm).await? {
            return Err(AppError::Conflict(
                "Ce point marchand existe déjà dans la base".to_string(),
            ));
        }

        let pm = self
            .merchants
            .create(&request.pm, request.latitude, request.longitude)
            .await?;

        log::info!("📍 Point marchand '{}' creado", pm.nom_pm);

        Ok(ApiResponse::success_with_message(
            pm,
            "Le point marchand a bien été enregistré".to_string(),
        ))
    }

    pub async fn get_serials_by_merchant(
        &self,
        request: SnByMerchantRequest,
    ) -> Result<Vec<SerialNumberRow>, AppError> {
        require_not_empty(&request.point_marchand, "Tous les champs sont requis")?;

        let serials = self
            .merchants
            .serials_by_merchant_like(&request.point_marchand)
            .await?;
        if serials.is_empty() {
            return Err(AppError::NotFound(
                "Aucun TPE trouvé pour ce point marchand".to_string(),
            ));
        }
        Ok(serials)
    }
}
