//! DTOs de points marchands

use serde::{Deserialize, Serialize};

/// Request de création / correction de un point marchand
#[derive(Debug, Deserialize)]
pub struct UpdateMerchantRequest {
    pub pm: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Request de búsqueda de points marchands cercanos al teléfono
#[derive(Debug, Deserialize)]
pub struct NearbyMerchantsRequest {
    #[serde(rename = "latitudeTelephone")]
    pub latitude_telephone: f64,
    #[serde(rename = "longitudeTelephone")]
    pub longitude_telephone: f64,
}

/// Request de numéros de série por point marchand
#[derive(Debug, Deserialize)]
pub struct SnByMerchantRequest {
    #[serde(rename = "pointMarchand")]
    pub point_marchand: String,
}

/// Numéro de série encontrado
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SerialNumberRow {
    pub serial_number_tpe: String,
}
