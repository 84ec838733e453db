//! Envío de plantillas WhatsApp (Graph API)
//!
//! Colaborador fire-and-forget: los fallos se loguean y nunca bloquean
//! la operación principal. Los números se normalizan al indicatif +225
//! antes del envío.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

use crate::utils::errors::AppError;

/// Indicatif par défaut (Côte d'Ivoire)
const DEFAULT_DIAL_PREFIX: &str = "+225";

const GRAPH_API_BASE: &str = "https://graph.facebook.com/v19.0";

lazy_static! {
    static ref PHONE_RE: Regex = Regex::new(r"^\+\d{8,15}$").expect("regex de teléfono inválida");
}

/// Normalizar un número local al formato internacional `+225…`
pub fn normalize_phone(raw: &str) -> Result<String, AppError> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let candidate = if cleaned.starts_with('+') {
        cleaned
    } else {
        format!("{}{}", DEFAULT_DIAL_PREFIX, cleaned)
    };

    if !PHONE_RE.is_match(&candidate) {
        return Err(AppError::Validation(format!(
            "Numéro de téléphone invalide: '{}'",
            raw
        )));
    }

    Ok(candidate)
}

pub struct WhatsappService {
    client: reqwest::Client,
    phone_id: String,
    token: String,
}

impl WhatsappService {
    pub fn new(client: reqwest::Client, phone_id: String, token: String) -> Self {
        Self {
            client,
            phone_id,
            token,
        }
    }

    /// Nouveau routing asignado: plantilla `validation_tpe`
    pub async fn send_routing_notification(
        &self,
        to: &str,
        agent_name: &str,
        pm_names: &[String],
        bdm_name: &str,
    ) -> Result<(), AppError> {
        let pm_text = pm_names.join("; ");
        self.send_template(
            to,
            "validation_tpe",
            &[agent_name, &pm_text, bdm_name],
        )
        .await
    }

    /// Livraison validée: plantilla `deploiement_tpe`
    pub async fn send_deployment_notification(
        &self,
        to: &str,
        agent_name: &str,
        tpes: &str,
    ) -> Result<(), AppError> {
        self.send_template(to, "deploiement_tpe", &[agent_name, tpes])
            .await
    }

    /// Visite enregistrée: plantilla `rapport_routine` hacia el BDM
    pub async fn send_visit_notification(
        &self,
        to: &str,
        agent_name: &str,
        point_marchand: &str,
    ) -> Result<(), AppError> {
        self.send_template(to, "rapport_routine", &[agent_name, point_marchand])
            .await
    }

    async fn send_template(
        &self,
        to: &str,
        template_name: &str,
        parameters: &[&str],
    ) -> Result<(), AppError> {
        let number = normalize_phone(to)?;

        let components = json!([{
            "type": "body",
            "parameters": parameters
                .iter()
                .map(|text| json!({ "type": "text", "text": text }))
                .collect::<Vec<_>>(),
        }]);

        let body = json!({
            "messaging_product": "whatsapp",
            "to": number,
            "type": "template",
            "template": {
                "name": template_name,
                "language": { "code": "fr" },
                "components": components,
            }
        });

        let url = format!("{}/{}/messages", GRAPH_API_BASE, self.phone_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error llamando a WhatsApp: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "WhatsApp rechazó la plantilla '{}' ({}): {}",
                template_name, status, detail
            )));
        }

        log::info!("📲 Plantilla '{}' enviada a {}", template_name, number);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_local_number_gets_prefix() {
        assert_eq!(
            normalize_phone("0708091011").unwrap(),
            "+2250708091011"
        );
    }

    #[test]
    fn test_normalize_keeps_international_number() {
        assert_eq!(
            normalize_phone("+2250708091011").unwrap(),
            "+2250708091011"
        );
    }

    #[test]
    fn test_normalize_strips_spaces() {
        assert_eq!(
            normalize_phone("07 08 09 10 11").unwrap(),
            "+2250708091011"
        );
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_phone("pas-un-numero").is_err());
        assert!(normalize_phone("").is_err());
    }
}
