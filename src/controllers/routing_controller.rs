//! Gestión de routings (plans de visites)
//!
//! La création valida campos, orden de fechas y existencia de BDM y
//! agent; la lista de points marchands queda serializada e inmutable.
//! La unicidad del plan par défaut la garantiza el índice del schema.

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveTime, TimeZone, Utc};
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::routing_dto::{CreateRoutingRequest, RoutingWithAgent};
use crate::models::agent::{Agent, Bdm};
use crate::models::routing::Routing;
use crate::repositories::agent_repository::AgentRepository;
use crate::repositories::routing_repository::RoutingRepository;
use crate::services::push_service::PushService;
use crate::services::whatsapp_service::WhatsappService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::{parse_date, validate_date_range};

pub struct RoutingController {
    agents: AgentRepository,
    routings: RoutingRepository,
    whatsapp: Option<Arc<WhatsappService>>,
    push: Option<Arc<PushService>>,
}

impl RoutingController {
    pub fn new(state: &AppState) -> Self {
        Self {
            agents: AgentRepository::new(state.pool.clone()),
            routings: RoutingRepository::new(state.pool.clone()),
            whatsapp: state.whatsapp.clone(),
            push: state.push.clone(),
        }
    }

    pub async fn create_routing(
        &self,
        request: CreateRoutingRequest,
    ) -> Result<ApiResponse<Routing>, AppError> {
        request
            .validate()
            .map_err(|_| AppError::Validation("Veuillez remplir tous les champs".to_string()))?;

        let debut = parse_date(&request.date_debut_routing)?;
        let fin = parse_date(&request.date_fin_routing)?;
        validate_date_range(debut, fin)?;

        let today = Local::now().date_naive();
        if debut < today {
            return Err(AppError::Validation(
                "La date de début doit être supérieure à la date actuelle".to_string(),
            ));
        }

        let bdm = self
            .agents
            .find_bdm_by_id(request.bdm)
            .await?
            .ok_or_else(|| AppError::NotFound("Ce responsable n'existe pas".to_string()))?;
        let agent = self
            .agents
            .find_by_id(request.agent)
            .await?
            .ok_or_else(|| AppError::NotFound("Cet agent n'existe pas".to_string()))?;

        let pm_routing = serde_json::to_string(&request.pm_routing)
            .map_err(|e| AppError::Internal(format!("Serialización de pm_routing: {}", e)))?;

        let routing = self
            .routings
            .create(
                &request.description_routing,
                to_utc_midnight(debut)?,
                to_utc_midnight(fin)?,
                &pm_routing,
                agent.id,
                bdm.id,
            )
            .await?;

        log::info!(
            "🗺️ Routing {} creado para el agent {} ({} points marchands)",
            routing.id,
            agent.id,
            request.pm_routing.len()
        );

        self.notify_agent(&agent, &bdm, &request);

        Ok(ApiResponse::success_with_message(
            routing,
            "Routing créé avec succès".to_string(),
        ))
    }

    pub async fn get_routings_by_commercial(
        &self,
        agent_id: i32,
    ) -> Result<Vec<Routing>, AppError> {
        self.agents
            .find_by_id(agent_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cet agent n'existe pas".to_string()))?;

        let routings = self.routings.find_by_agent(agent_id).await?;
        if routings.is_empty() {
            return Err(AppError::NotFound("Vous n'avez pas de routing".to_string()));
        }
        Ok(routings)
    }

    pub async fn get_routings_by_bdm(
        &self,
        bdm_id: i32,
    ) -> Result<Vec<RoutingWithAgent>, AppError> {
        self.agents
            .find_bdm_by_id(bdm_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ce BDM n'existe pas".to_string()))?;

        let routings = self.routings.find_by_bdm(bdm_id).await?;
        if routings.is_empty() {
            return Err(AppError::NotFound("Vous n'avez aucun routing".to_string()));
        }

        // Adjuntar la identidad del agent en memoria
        let team = self.agents.find_by_bdm(bdm_id).await?;
        let mut result = Vec::with_capacity(routings.len());
        for routing in routings {
            let agent = match team.iter().find(|a| a.id == routing.agent_routing_id) {
                Some(agent) => agent.clone(),
                None => self
                    .agents
                    .find_by_id(routing.agent_routing_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(format!(
                            "Agent {} référencé par le routing {} introuvable",
                            routing.agent_routing_id, routing.id
                        ))
                    })?,
            };
            result.push(RoutingWithAgent { routing, agent });
        }

        Ok(result)
    }

    /// WhatsApp + push al agent, fire-and-forget
    fn notify_agent(&self, agent: &Agent, bdm: &Bdm, request: &CreateRoutingRequest) {
        let pm_names: Vec<String> = request
            .pm_routing
            .iter()
            .map(|entry| entry.nom_pm.clone())
            .collect();

        if let Some(whatsapp) = self.whatsapp.clone() {
            let phone = agent.numero_telephone_agent.clone();
            let agent_name = agent.display_name();
            let bdm_name = bdm.display_name();
            let pm_names = pm_names.clone();
            tokio::spawn(async move {
                if let Err(e) = whatsapp
                    .send_routing_notification(&phone, &agent_name, &pm_names, &bdm_name)
                    .await
                {
                    log::warn!("⚠️ WhatsApp de routing no enviado: {}", e);
                }
            });
        }

        if let (Some(push), Some(token)) = (self.push.clone(), agent.fcm_token_agent.clone()) {
            let agent_name = agent.display_name();
            let bdm_name = bdm.display_name();
            tokio::spawn(async move {
                if let Err(e) = push
                    .send_routing_push(&token, &agent_name, &pm_names, &bdm_name)
                    .await
                {
                    log::warn!("⚠️ Push de routing no enviado: {}", e);
                }
            });
        }
    }
}

fn to_utc_midnight(date: NaiveDate) -> Result<chrono::DateTime<Utc>, AppError> {
    Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::Internal("Date non représentable".to_string()))
}
