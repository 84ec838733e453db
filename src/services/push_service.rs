//! Notificaciones push (FCM)
//!
//! Aviso al agent cuando se le asigna un nouveau routing. Colaborador
//! fire-and-forget, como el resto de la mensajería.

use serde_json::json;

use crate::utils::errors::AppError;

const FCM_SEND_URL: &str = "https://fcm.googleapis.com/fcm/send";

/// Cuerpo del mensaje de routing, en el formato histórico
pub fn format_routing_message(agent_name: &str, pm_names: &[String], bdm_name: &str) -> String {
    format!(
        "ROUTING COMMERCIAL\nBonjour {},\n\nVoici le routing pour cette semaine :\n{}\nMerci de suivre ce routing et de visiter les points marchands mentionnés.\n\nCordialement,\n{}",
        agent_name,
        pm_names.join(" "),
        bdm_name
    )
}

pub struct PushService {
    client: reqwest::Client,
    server_key: String,
}

impl PushService {
    pub fn new(client: reqwest::Client, server_key: String) -> Self {
        Self { client, server_key }
    }

    pub async fn send_routing_push(
        &self,
        device_token: &str,
        agent_name: &str,
        pm_names: &[String],
        bdm_name: &str,
    ) -> Result<(), AppError> {
        let body = json!({
            "to": device_token,
            "notification": {
                "title": "Votre Nouveau Routing Commercial",
                "body": format_routing_message(agent_name, pm_names, bdm_name),
            }
        });

        let response = self
            .client
            .post(FCM_SEND_URL)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error llamando a FCM: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "FCM rechazó la notificación ({}): {}",
                status, detail
            )));
        }

        log::info!("🔔 Push de routing enviado a {}", agent_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_routing_message() {
        let message = format_routing_message(
            "KOUASSI Jean",
            &["CHINA MALL VGE".to_string(), "CITY CENTER".to_string()],
            "DIALLO Awa",
        );
        assert!(message.contains("Bonjour KOUASSI Jean"));
        assert!(message.contains("CHINA MALL VGE CITY CENTER"));
        assert!(message.ends_with("DIALLO Awa"));
    }
}
