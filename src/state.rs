//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los handles de colaboradores externos se
//! construyen una sola vez aquí y se inyectan a los controllers; si
//! faltan credenciales el colaborador queda en `None` y las operaciones
//! primarias siguen funcionando sin él.

use std::sync::Arc;

use reqwest::Client;
use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::cloudinary_service::{CloudinaryService, ImageHost};
use crate::services::push_service::PushService;
use crate::services::report_feed::ReportFeed;
use crate::services::whatsapp_service::WhatsappService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub http_client: Client,
    pub image_host: Option<Arc<dyn ImageHost>>,
    pub whatsapp: Option<Arc<WhatsappService>>,
    pub push: Option<Arc<PushService>>,
    pub report_feed: ReportFeed,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        let image_host: Option<Arc<dyn ImageHost>> = match (
            config.cloudinary_cloud_name.clone(),
            config.cloudinary_upload_preset.clone(),
        ) {
            (Some(cloud_name), Some(preset)) => Some(Arc::new(CloudinaryService::new(
                http_client.clone(),
                cloud_name,
                preset,
            ))),
            _ => {
                tracing::warn!("⚠️ Cloudinary sin configurar: las imágenes no se subirán");
                None
            }
        };

        let whatsapp = match (config.whatsapp_phone_id.clone(), config.whatsapp_token.clone()) {
            (Some(phone_id), Some(token)) => Some(Arc::new(WhatsappService::new(
                http_client.clone(),
                phone_id,
                token,
            ))),
            _ => {
                tracing::warn!("⚠️ WhatsApp sin configurar: mensajería deshabilitada");
                None
            }
        };

        let push = config.fcm_server_key.clone().map(|server_key| {
            Arc::new(PushService::new(http_client.clone(), server_key))
        });

        Self {
            pool,
            config,
            http_client,
            image_host,
            whatsapp,
            push,
            report_feed: ReportFeed::new(),
        }
    }
}
