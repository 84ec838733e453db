//! Hébergement de imágenes (Cloudinary)
//!
//! La app móvil envía las fotos de los TPE en base64; aquí se suben al
//! hébergeur y se persiste solo la URL durable. El trait `ImageHost` es
//! la costura de inyección: los workflows reciben el handle en
//! construcción y los tests pueden sustituirlo.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;

use crate::utils::errors::AppError;

/// Colaborador de hébergement de imágenes
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Sube una imagen base64 y devuelve su URL durable
    async fn upload_base64(&self, base64_image: &str) -> Result<String, AppError>;
}

pub struct CloudinaryService {
    client: reqwest::Client,
    cloud_name: String,
    upload_preset: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
}

impl CloudinaryService {
    pub fn new(client: reqwest::Client, cloud_name: String, upload_preset: String) -> Self {
        Self {
            client,
            cloud_name,
            upload_preset,
        }
    }
}

/// Quitar el préfixe data-URI si viene incluido y verificar que el
/// payload es base64 decodificable
pub fn normalize_base64_payload(payload: &str) -> Result<String, AppError> {
    let cleaned = match payload.find("base64,") {
        Some(pos) => &payload[pos + "base64,".len()..],
        None => payload,
    };
    let cleaned = cleaned.trim();

    base64::engine::general_purpose::STANDARD
        .decode(cleaned)
        .map_err(|_| AppError::Validation("L'image fournie n'est pas un base64 valide".to_string()))?;

    Ok(cleaned.to_string())
}

#[async_trait]
impl ImageHost for CloudinaryService {
    async fn upload_base64(&self, base64_image: &str) -> Result<String, AppError> {
        let payload = normalize_base64_payload(base64_image)?;

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        );

        let body = serde_json::json!({
            "file": format!("data:image/jpeg;base64,{}", payload),
            "upload_preset": self.upload_preset,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error enviando la imagen: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Upload rechazado por el hébergeur ({}): {}",
                status, detail
            )));
        }

        let parsed: CloudinaryUploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Respuesta del hébergeur ilegible: {}", e)))?;

        log::info!("🖼️ Imagen subida: {}", parsed.secure_url);
        Ok(parsed.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_base64() {
        // "hola" en base64
        let normalized = normalize_base64_payload("aG9sYQ==").unwrap();
        assert_eq!(normalized, "aG9sYQ==");
    }

    #[test]
    fn test_normalize_strips_data_uri_prefix() {
        let normalized =
            normalize_base64_payload("data:image/jpeg;base64,aG9sYQ==").unwrap();
        assert_eq!(normalized, "aG9sYQ==");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_base64_payload("pas du base64 !!!").is_err());
    }
}
