//! Orquestación del reporting terrain
//!
//! Valida el scope y la ventana antes de cualquier query, lee el
//! datastore de reporting con reintento acotado, delega la agregación al
//! núcleo puro y difunde el resultado al canal en vivo (best-effort).

use chrono::Utc;

use crate::database::with_retry;
use crate::dto::report_dto::{
    AgentReportSummary, ReportByBdmRequest, ReportDirectionRequest, ReportEvent,
};
use crate::models::agent::Agent;
use crate::models::user::ROLE_DIRECTION;
use crate::repositories::agent_repository::AgentRepository;
use crate::repositories::routine_repository::RoutineRepository;
use crate::repositories::routing_repository::RoutingRepository;
use crate::services::report_feed::ReportFeed;
use crate::services::report_service::{build_report, resolve_window};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct ReportController {
    agents: AgentRepository,
    routings: RoutingRepository,
    routines: RoutineRepository,
    feed: ReportFeed,
}

impl ReportController {
    pub fn new(state: &AppState) -> Self {
        Self {
            agents: AgentRepository::new(state.pool.clone()),
            routings: RoutingRepository::new(state.pool.clone()),
            routines: RoutineRepository::new(state.pool.clone()),
            feed: state.report_feed.clone(),
        }
    }

    /// Reporte de los agents de un BDM
    pub async fn report_by_bdm(
        &self,
        request: ReportByBdmRequest,
    ) -> Result<Vec<AgentReportSummary>, AppError> {
        let bdm_id = request.bdm_id.ok_or_else(|| {
            AppError::Validation("bdmId est requis".to_string())
        })?;
        let (debut, fin) =
            resolve_window(request.date_debut.as_deref(), request.date_fin.as_deref())?;

        self.agents
            .find_bdm_by_id(bdm_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ce BDM n'existe pas".to_string()))?;

        let agents = self.agents.find_by_bdm(bdm_id).await?;
        self.build_and_publish(format!("bdm:{}", bdm_id), agents, debut, fin)
            .await
    }

    /// Reporte a nivel dirección: toda la agencia salvo los roles
    /// privilegiados
    pub async fn report_direction(
        &self,
        request: ReportDirectionRequest,
    ) -> Result<Vec<AgentReportSummary>, AppError> {
        let (debut, fin) =
            resolve_window(request.date_debut.as_deref(), request.date_fin.as_deref())?;

        let agents = self.agents.find_all_excluding_role(ROLE_DIRECTION).await?;
        self.build_and_publish("direction".to_string(), agents, debut, fin)
            .await
    }

    async fn build_and_publish(
        &self,
        scope: String,
        agents: Vec<Agent>,
        debut: chrono::DateTime<Utc>,
        fin: chrono::DateTime<Utc>,
    ) -> Result<Vec<AgentReportSummary>, AppError> {
        let agent_ids: Vec<i32> = agents.iter().map(|a| a.id).collect();

        // Lecturas del datastore de reporting con reintento acotado
        let routings = with_retry("routings de la fenêtre", || {
            self.routings.created_between_for_agents(&agent_ids, debut, fin)
        })
        .await?;
        let routines = with_retry("routines de la fenêtre", || {
            self.routines.between_for_agents(&agent_ids, debut, fin)
        })
        .await?;

        let resumes = build_report(&agents, &routings, &routines);

        log::info!(
            "📊 Reporte '{}': {} agents, {} routings, {} visites",
            scope,
            agents.len(),
            routings.len(),
            routines.len()
        );

        // Difusión en vivo best-effort: el response síncrono ya está listo
        self.feed.publish(ReportEvent {
            scope,
            genere_le: Utc::now(),
            date_debut: debut,
            date_fin: fin,
            resumes: resumes.clone(),
        });

        Ok(resumes)
    }
}
