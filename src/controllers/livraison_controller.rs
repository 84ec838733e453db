//! Gestión de livraisons de TPE
//!
//! El registro persiste la livraison y sus numéros de série en una sola
//! transacción. La validation es única: una livraison ya validada no se
//! vuelve a validar; tras la transition de statut se avisa por WhatsApp
//! a los agents de las zonas afectadas, fire-and-forget.

use std::collections::HashSet;
use std::sync::Arc;

use crate::dto::common::ApiResponse;
use crate::dto::livraison_dto::{
    LivraisonWithTpes, SaveLivraisonRequest, ValiderLivraisonRequest,
};
use crate::models::livraison::{
    generate_numero_livraison, Livraison, STATUT_EN_ATTENTE_DEPLOIEMENT,
};
use crate::repositories::agent_repository::AgentRepository;
use crate::repositories::livraison_repository::LivraisonRepository;
use crate::repositories::merchant_repository::MerchantRepository;
use crate::services::whatsapp_service::WhatsappService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct LivraisonController {
    livraisons: LivraisonRepository,
    agents: AgentRepository,
    merchants: MerchantRepository,
    whatsapp: Option<Arc<WhatsappService>>,
}

impl LivraisonController {
    pub fn new(state: &AppState) -> Self {
        Self {
            livraisons: LivraisonRepository::new(state.pool.clone()),
            agents: AgentRepository::new(state.pool.clone()),
            merchants: MerchantRepository::new(state.pool.clone()),
            whatsapp: state.whatsapp.clone(),
        }
    }

    pub async fn save_livraison(
        &self,
        request: SaveLivraisonRequest,
    ) -> Result<ApiResponse<LivraisonWithTpes>, AppError> {
        if request.tpes.is_empty() {
            return Err(AppError::Validation(
                "La liste des TPE ne peut pas être vide".to_string(),
            ));
        }
        self.agents
            .find_by_id(request.agent_saisie)
            .await?
            .ok_or_else(|| AppError::NotFound("Cet agent n'existe pas".to_string()))?;

        let numero = generate_numero_livraison();
        let livraison = self
            .livraisons
            .create_with_tpes(&numero, request.agent_saisie, &request.tpes)
            .await?;

        log::info!(
            "📦 Livraison {} registrada ({} TPE)",
            livraison.livraison.numero_livraison,
            request.tpes.len()
        );

        Ok(ApiResponse::success_with_message(
            livraison,
            "Livraison enregistrée".to_string(),
        ))
    }

    pub async fn get_livraisons(&self) -> Result<Vec<Livraison>, AppError> {
        Ok(self.livraisons.find_all().await?)
    }

    pub async fn get_livraison(&self, id: i32) -> Result<LivraisonWithTpes, AppError> {
        let livraison = self
            .livraisons
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cette livraison n'existe pas".to_string()))?;
        let tpe_livraison = self.livraisons.find_tpes_of_livraison(id).await?;

        Ok(LivraisonWithTpes {
            livraison,
            tpe_livraison,
        })
    }

    pub async fn valider_livraison(
        &self,
        id: i32,
        request: ValiderLivraisonRequest,
    ) -> Result<ApiResponse<Livraison>, AppError> {
        let livraison = self
            .livraisons
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cette livraison n'existe pas".to_string()))?;

        if livraison.is_validated() {
            return Err(AppError::Conflict(
                "Cette livraison est déjà validée".to_string(),
            ));
        }

        self.agents
            .find_by_id(request.agent_validateur)
            .await?
            .ok_or_else(|| AppError::NotFound("Cet agent n'existe pas".to_string()))?;

        let updated = self
            .livraisons
            .mark_validated(id, request.agent_validateur, STATUT_EN_ATTENTE_DEPLOIEMENT)
            .await?;

        log::info!("✅ Livraison {} validada", updated.numero_livraison);

        // Aviso a los agents de las zonas donde van desplegados los TPE
        self.notify_zone_agents(&updated).await;

        Ok(ApiResponse::success_with_message(
            updated,
            "Livraison validée avec succès".to_string(),
        ))
    }

    async fn notify_zone_agents(&self, livraison: &Livraison) {
        let Some(whatsapp) = self.whatsapp.clone() else {
            return;
        };

        let serials: Vec<String> = match serde_json::from_str(&livraison.tpes) {
            Ok(serials) => serials,
            Err(e) => {
                log::warn!(
                    "⚠️ Lista de TPE ilegible en la livraison {}: {}",
                    livraison.id,
                    e
                );
                return;
            }
        };

        let mut zones_notified: HashSet<String> = HashSet::new();
        for serial in serials {
            let pm = match self.merchants.find_by_tpe_serial(&serial).await {
                Ok(Some(pm)) => pm,
                Ok(None) => {
                    log::warn!("⚠️ TPE '{}' sin point marchand conocido", serial);
                    continue;
                }
                Err(e) => {
                    log::warn!("⚠️ Error buscando el TPE '{}': {}", serial, e);
                    continue;
                }
            };

            let Some(zone) = pm.zone_pm.clone() else {
                continue;
            };
            // Una sola notificación por zona y por livraison
            if !zones_notified.insert(zone.clone()) {
                continue;
            }

            let agents = match self.agents.find_by_zone_name(&zone).await {
                Ok(agents) => agents,
                Err(e) => {
                    log::warn!("⚠️ Error buscando agents de la zone '{}': {}", zone, e);
                    continue;
                }
            };

            for agent in agents {
                let whatsapp = whatsapp.clone();
                let phone = agent.numero_telephone_agent.clone();
                let agent_name = agent.display_name();
                let detail = format!("{} - {}", pm.nom_pm, serial);
                tokio::spawn(async move {
                    if let Err(e) = whatsapp
                        .send_deployment_notification(&phone, &agent_name, &detail)
                        .await
                    {
                        log::warn!("⚠️ WhatsApp de déploiement no enviado: {}", e);
                    }
                });
            }
        }
    }
}
