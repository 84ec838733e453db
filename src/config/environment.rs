//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    /// Seuil de proximité (metros) para validar la presencia física
    /// en un punto marchand. También sirve de radio para la búsqueda
    /// de puntos marchands cercanos.
    pub proximity_threshold_m: f64,
    // Credenciales de colaboradores externos — opcionales: si faltan,
    // el colaborador correspondiente queda deshabilitado
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_upload_preset: Option<String>,
    pub whatsapp_phone_id: Option<String>,
    pub whatsapp_token: Option<String>,
    pub fcm_server_key: Option<String>,
}

impl EnvironmentConfig {
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expiration: env::var("JWT_EXPIRATION")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .expect("JWT_EXPIRATION must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
                .collect(),
            proximity_threshold_m: env::var("PROXIMITY_THRESHOLD_M")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("PROXIMITY_THRESHOLD_M must be a valid number"),
            cloudinary_cloud_name: env::var("CLOUDNAME").ok(),
            cloudinary_upload_preset: env::var("CLOUDINARY_UPLOAD_PRESET").ok(),
            whatsapp_phone_id: env::var("WHATSAPP_PHONE_ID").ok(),
            whatsapp_token: env::var("WHATSAPP_TOKEN").ok(),
            fcm_server_key: env::var("FCM_SERVER_KEY").ok(),
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
