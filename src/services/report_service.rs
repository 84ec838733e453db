//! Motor de agregación del reporting terrain
//!
//! Núcleo puro: recibe la población de agents, los routings creados en la
//! ventana y las routines ejecutadas, y produce un resumen por agent.
//! La acumulación es estrictamente por agent; la pertenencia "dans le
//! routing" se evalúa contra el plan del propio agent, nunca contra el
//! acumulado global.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};

use crate::dto::report_dto::{AgentReportSummary, InterventionEntry, PmOccurrence};
use crate::models::agent::Agent;
use crate::models::routine::Routine;
use crate::models::routing::Routing;
use crate::utils::errors::AppError;
use crate::utils::validation::{parse_date, validate_date_range};

/// Resolver la ventana de reporting.
///
/// Sin fechas: el día en curso en hora local. La validación (fin >= début)
/// ocurre antes de cualquier query.
pub fn resolve_window(
    date_debut: Option<&str>,
    date_fin: Option<&str>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let today = Local::now().date_naive();

    let debut = match date_debut {
        Some(raw) => parse_date(raw)?,
        None => today,
    };
    let fin = match date_fin {
        Some(raw) => parse_date(raw)?,
        None => debut,
    };

    validate_date_range(debut, fin)?;

    let debut_local = debut.and_time(NaiveTime::MIN);
    let fin_local = fin.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::microseconds(1);

    let debut_utc = Local
        .from_local_datetime(&debut_local)
        .earliest()
        .ok_or_else(|| AppError::Internal("Date de début non représentable".to_string()))?
        .with_timezone(&Utc);
    let fin_utc = Local
        .from_local_datetime(&fin_local)
        .earliest()
        .ok_or_else(|| AppError::Internal("Date de fin non représentable".to_string()))?
        .with_timezone(&Utc);

    Ok((debut_utc, fin_utc))
}

/// Clave de comparación de noms de points marchands
fn pm_key(name: &str) -> String {
    name.trim().to_uppercase()
}

struct AgentAccumulator {
    nombre_routings: u32,
    planifies: HashMap<String, (String, u32)>,
    visites: HashMap<String, (String, u32)>,
    dans_routing: u32,
    hors_routing: u32,
    interventions: Vec<InterventionEntry>,
}

impl AgentAccumulator {
    fn new() -> Self {
        Self {
            nombre_routings: 0,
            planifies: HashMap::new(),
            visites: HashMap::new(),
            dans_routing: 0,
            hors_routing: 0,
            interventions: Vec::new(),
        }
    }
}

fn occurrences_sorted(map: HashMap<String, (String, u32)>) -> Vec<PmOccurrence> {
    let mut list: Vec<PmOccurrence> = map
        .into_values()
        .map(|(nom_pm, occurrences)| PmOccurrence { nom_pm, occurrences })
        .collect();
    list.sort_by(|a, b| a.nom_pm.cmp(&b.nom_pm));
    list
}

/// Construir el resumen por agent a partir de los datos de la ventana.
///
/// Routings o routines de agents fuera de la población se ignoran: un
/// reporte por BDM no mezcla datos de otros equipos.
pub fn build_report(
    agents: &[Agent],
    routings: &[Routing],
    routines: &[Routine],
) -> Vec<AgentReportSummary> {
    let mut accumulators: HashMap<i32, AgentAccumulator> = agents
        .iter()
        .map(|agent| (agent.id, AgentAccumulator::new()))
        .collect();

    for routing in routings {
        let Some(acc) = accumulators.get_mut(&routing.agent_routing_id) else {
            continue;
        };
        acc.nombre_routings += 1;
        for entry in routing.parse_pm_list() {
            let slot = acc
                .planifies
                .entry(pm_key(&entry.nom_pm))
                .or_insert_with(|| (entry.nom_pm.clone(), 0));
            slot.1 += 1;
        }
    }

    for routine in routines {
        let Some(acc) = accumulators.get_mut(&routine.commercial_routine_id) else {
            continue;
        };
        let key = pm_key(&routine.point_marchand_routine);
        if acc.planifies.contains_key(&key) {
            acc.dans_routing += 1;
        } else {
            acc.hors_routing += 1;
        }
        let slot = acc
            .visites
            .entry(key)
            .or_insert_with(|| (routine.point_marchand_routine.clone(), 0));
        slot.1 += 1;
        acc.interventions.push(InterventionEntry {
            date: routine.date_routine,
            point_marchand: routine.point_marchand_routine.clone(),
            numero_routine: routine.numero_routine.clone(),
        });
    }

    agents
        .iter()
        .map(|agent| {
            let mut acc = accumulators
                .remove(&agent.id)
                .unwrap_or_else(AgentAccumulator::new);
            acc.interventions.sort_by_key(|entry| entry.date);
            let nombre_pm_planifies =
                acc.planifies.values().map(|(_, count)| count).sum::<u32>();
            AgentReportSummary {
                agent_id: agent.id,
                nom_agent: agent.display_name(),
                photo_profil: agent.photo_profil_agent.clone(),
                nombre_routings: acc.nombre_routings,
                nombre_pm_planifies,
                visites_dans_routing: acc.dans_routing,
                visites_hors_routing: acc.hors_routing,
                pm_planifies: occurrences_sorted(acc.planifies),
                pm_visites: occurrences_sorted(acc.visites),
                interventions: acc.interventions,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::routing::DEFAULT_ROUTING_DESCRIPTION;
    use chrono::TimeZone;

    fn agent(id: i32, nom: &str) -> Agent {
        Agent {
            id,
            nom_agent: nom.to_string(),
            prenom_agent: "Test".to_string(),
            numero_telephone_agent: "0708091011".to_string(),
            photo_profil_agent: None,
            responsable_agent_id: 2,
            zone_commerciale_id: None,
            code_authorisation_agent: None,
            fcm_token_agent: None,
            created_at: Utc::now(),
        }
    }

    fn routing(id: i32, agent_id: i32, description: &str, pm_list: &str) -> Routing {
        Routing {
            id,
            description_routing: description.to_string(),
            date_debut_routing: Utc::now(),
            date_fin_routing: Utc::now(),
            pm_routing: pm_list.to_string(),
            agent_routing_id: agent_id,
            bdm_routing_id: 2,
            created_at: Utc::now(),
        }
    }

    fn routine(id: i32, agent_id: i32, pm: &str, ts: DateTime<Utc>) -> Routine {
        Routine {
            id,
            numero_routine: format!("ROUTINE-{:04}", id),
            date_routine: ts,
            point_marchand_routine: pm.to_string(),
            veille_concurentielle_routine: None,
            commentaire_routine: None,
            latitude_marchand_routine: 5.3268,
            longitude_marchand_routine: -4.0227,
            commercial_routine_id: agent_id,
            routing_id: 1,
        }
    }

    #[test]
    fn test_single_agent_on_plan_visit() {
        let agents = vec![agent(11, "KOUASSI")];
        let routings = vec![routing(
            1,
            11,
            DEFAULT_ROUTING_DESCRIPTION,
            r#"[{"nom_pm":"CHINA MALL VGE"},{"nom_pm":"CITY CENTER"}]"#,
        )];
        let routines = vec![routine(1, 11, "CHINA MALL VGE", Utc::now())];

        let report = build_report(&agents, &routings, &routines);
        assert_eq!(report.len(), 1);
        let summary = &report[0];
        assert!(summary.nombre_routings >= 1);
        assert_eq!(summary.nombre_pm_planifies, 2);
        assert_eq!(summary.visites_dans_routing, 1);
        assert_eq!(summary.visites_hors_routing, 0);
        assert_eq!(summary.pm_visites.len(), 1);
        assert_eq!(summary.pm_visites[0].nom_pm, "CHINA MALL VGE");
    }

    #[test]
    fn test_off_plan_visit_is_counted_separately() {
        let agents = vec![agent(11, "KOUASSI")];
        let routings = vec![routing(
            1,
            11,
            "SEMAINE 23",
            r#"[{"nom_pm":"CITY CENTER"}]"#,
        )];
        let routines = vec![routine(1, 11, "CAP SUD", Utc::now())];

        let report = build_report(&agents, &routings, &routines);
        assert_eq!(report[0].visites_dans_routing, 0);
        assert_eq!(report[0].visites_hors_routing, 1);
    }

    #[test]
    fn test_no_cross_agent_contamination() {
        // El plan de A no convierte en "dans le routing" las visites de B
        let agents = vec![agent(11, "KOUASSI"), agent(12, "DIALLO")];
        let routings = vec![routing(
            1,
            11,
            "SEMAINE 23",
            r#"[{"nom_pm":"CHINA MALL VGE"}]"#,
        )];
        let routines = vec![routine(1, 12, "CHINA MALL VGE", Utc::now())];

        let report = build_report(&agents, &routings, &routines);
        let a = report.iter().find(|s| s.agent_id == 11).unwrap();
        let b = report.iter().find(|s| s.agent_id == 12).unwrap();
        assert_eq!(a.nombre_pm_planifies, 1);
        assert_eq!(a.visites_dans_routing, 0);
        assert_eq!(b.visites_dans_routing, 0);
        assert_eq!(b.visites_hors_routing, 1);
    }

    #[test]
    fn test_malformed_pm_list_contributes_empty() {
        let agents = vec![agent(11, "KOUASSI")];
        let routings = vec![routing(1, 11, "SEMAINE 23", "pas du json")];

        let report = build_report(&agents, &routings, &[]);
        assert_eq!(report[0].nombre_routings, 1);
        assert_eq!(report[0].nombre_pm_planifies, 0);
    }

    #[test]
    fn test_population_scoping_ignores_foreign_rows() {
        // Datos de un agent fuera de la población no aparecen en el reporte
        let agents = vec![agent(11, "KOUASSI")];
        let routings = vec![routing(1, 99, "SEMAINE 23", r#"[{"nom_pm":"CAP SUD"}]"#)];
        let routines = vec![routine(1, 99, "CAP SUD", Utc::now())];

        let report = build_report(&agents, &routings, &routines);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].nombre_routings, 0);
        assert_eq!(report[0].visites_dans_routing, 0);
        assert_eq!(report[0].visites_hors_routing, 0);
    }

    #[test]
    fn test_membership_is_case_insensitive() {
        let agents = vec![agent(11, "KOUASSI")];
        let routings = vec![routing(
            1,
            11,
            "SEMAINE 23",
            r#"[{"nom_pm":"China Mall VGE"}]"#,
        )];
        let routines = vec![routine(1, 11, "CHINA MALL VGE", Utc::now())];

        let report = build_report(&agents, &routings, &routines);
        assert_eq!(report[0].visites_dans_routing, 1);
    }

    #[test]
    fn test_interventions_are_chronological() {
        let agents = vec![agent(11, "KOUASSI")];
        let t1 = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 6, 3, 14, 0, 0).unwrap();
        let routines = vec![
            routine(2, 11, "CITY CENTER", t2),
            routine(1, 11, "CHINA MALL VGE", t1),
        ];

        let report = build_report(&agents, &[], &routines);
        let interventions = &report[0].interventions;
        assert_eq!(interventions.len(), 2);
        assert_eq!(interventions[0].point_marchand, "CHINA MALL VGE");
        assert_eq!(interventions[1].point_marchand, "CITY CENTER");
    }

    #[test]
    fn test_resolve_window_rejects_inverted_range() {
        let result = resolve_window(Some("2024-06-07"), Some("2024-06-01"));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_resolve_window_single_day() {
        let (debut, fin) = resolve_window(Some("2024-06-03"), Some("2024-06-03")).unwrap();
        assert!(debut < fin);
        assert!(fin - debut < Duration::days(1));
    }

    #[test]
    fn test_resolve_window_defaults_to_today() {
        let (debut, fin) = resolve_window(None, None).unwrap();
        let now = Utc::now();
        assert!(debut <= now && now <= fin);
    }
}
