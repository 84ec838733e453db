//! DTOs del reporting de actividad terrain
//!
//! Un resumen por agent: routings asignados, points marchands planificados
//! y visites ejecutadas (dentro o fuera del plan) en la ventana pedida.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request de reporte por BDM
#[derive(Debug, Deserialize)]
pub struct ReportByBdmRequest {
    #[serde(rename = "bdmId")]
    pub bdm_id: Option<i32>,
    /// Format AAAA-MM-JJ; por defecto el día en curso
    #[serde(rename = "dateDebut")]
    pub date_debut: Option<String>,
    #[serde(rename = "dateFin")]
    pub date_fin: Option<String>,
}

/// Request de reporte a nivel dirección commerciale
#[derive(Debug, Deserialize, Default)]
pub struct ReportDirectionRequest {
    #[serde(rename = "dateDebut")]
    pub date_debut: Option<String>,
    #[serde(rename = "dateFin")]
    pub date_fin: Option<String>,
}

/// Point marchand con su número de ocurrencias
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PmOccurrence {
    pub nom_pm: String,
    pub occurrences: u32,
}

/// Entrada del journal chronologique de intervenciones
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InterventionEntry {
    pub date: DateTime<Utc>,
    pub point_marchand: String,
    pub numero_routine: String,
}

/// Resumen estadístico de un agent en la ventana pedida
#[derive(Debug, Clone, Serialize)]
pub struct AgentReportSummary {
    pub agent_id: i32,
    pub nom_agent: String,
    pub photo_profil: Option<String>,
    pub nombre_routings: u32,
    pub nombre_pm_planifies: u32,
    pub visites_dans_routing: u32,
    pub visites_hors_routing: u32,
    pub pm_planifies: Vec<PmOccurrence>,
    pub pm_visites: Vec<PmOccurrence>,
    pub interventions: Vec<InterventionEntry>,
}

/// Reporte completo, también difundido al canal en vivo
#[derive(Debug, Clone, Serialize)]
pub struct ReportEvent {
    pub scope: String,
    pub genere_le: DateTime<Utc>,
    pub date_debut: DateTime<Utc>,
    pub date_fin: DateTime<Utc>,
    pub resumes: Vec<AgentReportSummary>,
}
