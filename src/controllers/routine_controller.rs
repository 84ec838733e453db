//! Workflow de enregistrement de visites (routines)
//!
//! Valida agent, routing aplicable y presencia física en el point
//! marchand, y persiste la visite con sus TPE en una sola transacción.
//! Las imágenes se suben antes de abrir la transacción; la mensajería se
//! dispara después del commit y nunca bloquea el resultado.

use std::sync::Arc;

use sqlx::PgPool;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::routine_dto::{MakeRoutineRequest, RoutineWithTpes, TpeRoutineEntry};
use crate::dto::routing_dto::RoutingSelector;
use crate::repositories::agent_repository::AgentRepository;
use crate::repositories::merchant_repository::MerchantRepository;
use crate::repositories::routine_repository::{
    NewRoutine, NewTpeRoutine, RoutineRepository,
};
use crate::repositories::routing_repository::RoutingRepository;
use crate::services::cloudinary_service::ImageHost;
use crate::services::whatsapp_service::WhatsappService;
use crate::state::AppState;
use crate::models::routine::generate_numero_routine;
use crate::utils::errors::AppError;
use crate::utils::geo::calculate_distance;
use crate::utils::validation::{require_not_empty, validate_coordinates};

pub struct RoutineController {
    pool: PgPool,
    proximity_threshold_m: f64,
    agents: AgentRepository,
    routings: RoutingRepository,
    merchants: MerchantRepository,
    routines: RoutineRepository,
    image_host: Option<Arc<dyn ImageHost>>,
    whatsapp: Option<Arc<WhatsappService>>,
}

impl RoutineController {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
            proximity_threshold_m: state.config.proximity_threshold_m,
            agents: AgentRepository::new(state.pool.clone()),
            routings: RoutingRepository::new(state.pool.clone()),
            merchants: MerchantRepository::new(state.pool.clone()),
            routines: RoutineRepository::new(state.pool.clone()),
            image_host: state.image_host.clone(),
            whatsapp: state.whatsapp.clone(),
        }
    }

    pub async fn make_routine(
        &self,
        request: MakeRoutineRequest,
    ) -> Result<ApiResponse<RoutineWithTpes>, AppError> {
        // 1. Precondiciones síncronas, antes de cualquier escritura
        request
            .validate()
            .map_err(|_| AppError::Validation(
                "Tous les champs obligatoires doivent être remplis".to_string(),
            ))?;
        require_not_empty(
            &request.point_marchand,
            "Tous les champs obligatoires doivent être remplis",
        )?;
        validate_coordinates(request.latitude_reel, request.longitude_reel)?;

        // 2. Agent
        let agent = self
            .agents
            .find_by_id(request.commercial_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Cet agent n'existe pas dans la base".to_string())
            })?;

        // 3. Routing aplicable (explícito o par défaut)
        let selector = RoutingSelector::from(request.routing_id);
        let routing = self
            .routings
            .resolve(agent.id, selector)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Aucun routing applicable pour cet agent".to_string())
            })?;

        // 4. Point marchand por sous-chaîne, primera coincidencia
        let pm = self
            .merchants
            .find_first_by_name_like(&request.point_marchand)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Ce point marchand n'existe pas".to_string())
            })?;

        // 5. Control de presencia física
        let distance = calculate_distance(
            request.latitude_reel,
            request.longitude_reel,
            pm.latitude_pm,
            pm.longitude_pm,
        );
        if !(distance <= self.proximity_threshold_m) {
            return Err(AppError::TooFar {
                distance,
                threshold: self.proximity_threshold_m,
            });
        }

        // Subida de imágenes fuera de la transacción: un fallo del
        // hébergeur deja la référence en NULL y la visite sigue adelante
        let image_urls = self.upload_images(&request.tpe_list).await;

        // 6-7. Escritura atómica: routine + todas las filas tpe_routine
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Persistence(format!("Error abriendo la transacción: {}", e)))?;

        let routine = self
            .routines
            .insert_routine(
                &mut tx,
                NewRoutine {
                    numero_routine: &generate_numero_routine(),
                    point_marchand: &pm.nom_pm,
                    veille_concurrentielle: request.veille_concurrentielle.as_deref(),
                    commentaire: request.commentaire_routine.as_deref(),
                    latitude_marchand: pm.latitude_pm,
                    longitude_marchand: pm.longitude_pm,
                    commercial_id: agent.id,
                    routing_id: routing.id,
                },
            )
            .await
            .map_err(|e| AppError::Persistence(format!("Error creando la routine: {}", e)))?;

        let mut tpe_rows = Vec::with_capacity(request.tpe_list.len());
        for (entry, image_url) in request.tpe_list.iter().zip(image_urls.iter()) {
            let row = self
                .routines
                .insert_tpe_routine(
                    &mut tx,
                    routine.id,
                    NewTpeRoutine {
                        id_terminal: &entry.id_terminal,
                        etat_tpe: &entry.etat_tpe,
                        etat_chargeur: &entry.etat_chargeur,
                        probleme_bancaire: entry.probleme_bancaire,
                        description_probleme_bancaire: entry
                            .description_probleme_bancaire
                            .as_deref(),
                        probleme_mobile: entry.probleme_mobile,
                        description_probleme_mobile: entry
                            .description_probleme_mobile
                            .as_deref(),
                        commentaire: entry.commentaire.as_deref(),
                        image_url: image_url.as_deref(),
                    },
                )
                .await
                .map_err(|e| {
                    AppError::Persistence(format!(
                        "Error registrando el TPE '{}': {}",
                        entry.id_terminal, e
                    ))
                })?;
            tpe_rows.push(row);
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Persistence(format!("Error confirmando la visite: {}", e)))?;

        log::info!(
            "✅ Visite {} registrada: agent {} chez '{}' ({:.1} m)",
            routine.numero_routine,
            agent.id,
            pm.nom_pm,
            distance
        );

        // 8. Notificación al BDM, fire-and-forget
        self.notify_bdm(&agent.display_name(), agent.responsable_agent_id, &pm.nom_pm)
            .await;

        Ok(ApiResponse::success_with_message(
            RoutineWithTpes {
                routine,
                tpe_routine: tpe_rows,
            },
            "Votre visite a bien été enregistrée".to_string(),
        ))
    }

    pub async fn get_routines(&self) -> Result<Vec<RoutineWithTpes>, AppError> {
        let routines = self.routines.find_all_with_tpes().await?;
        if routines.is_empty() {
            return Err(AppError::NotFound("Aucune routine trouvée".to_string()));
        }
        Ok(routines)
    }

    pub async fn get_routines_by_commercial(
        &self,
        agent_id: i32,
    ) -> Result<Vec<RoutineWithTpes>, AppError> {
        self.agents
            .find_by_id(agent_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ce commercial n'existe pas".to_string()))?;

        let routines = self.routines.find_by_commercial_with_tpes(agent_id).await?;
        if routines.is_empty() {
            return Err(AppError::NotFound("Vous n'avez pas de routine".to_string()));
        }
        Ok(routines)
    }

    async fn upload_images(&self, tpe_list: &[TpeRoutineEntry]) -> Vec<Option<String>> {
        let Some(host) = &self.image_host else {
            if tpe_list.iter().any(|t| t.image_tpe_routine.is_some()) {
                log::warn!("⚠️ Hébergeur de imágenes deshabilitado: fotos ignoradas");
            }
            return vec![None; tpe_list.len()];
        };

        let uploads = tpe_list.iter().map(|entry| async move {
            match &entry.image_tpe_routine {
                Some(image) => match host.upload_base64(image).await {
                    Ok(url) => Some(url),
                    Err(e) => {
                        log::warn!(
                            "⚠️ Fallo subiendo la foto del TPE '{}': {}",
                            entry.id_terminal,
                            e
                        );
                        None
                    }
                },
                None => None,
            }
        });

        futures::future::join_all(uploads).await
    }

    async fn notify_bdm(&self, agent_name: &str, bdm_id: i32, point_marchand: &str) {
        let Some(whatsapp) = self.whatsapp.clone() else {
            return;
        };

        match self.agents.find_bdm_by_id(bdm_id).await {
            Ok(Some(bdm)) => {
                let agent_name = agent_name.to_string();
                let point_marchand = point_marchand.to_string();
                tokio::spawn(async move {
                    if let Err(e) = whatsapp
                        .send_visit_notification(
                            &bdm.numero_telephone_bdm,
                            &agent_name,
                            &point_marchand,
                        )
                        .await
                    {
                        log::warn!("⚠️ Notificación de visite no enviada: {}", e);
                    }
                });
            }
            Ok(None) => log::warn!("⚠️ BDM {} inexistant, sin notificación", bdm_id),
            Err(e) => log::warn!("⚠️ No se pudo cargar el BDM {}: {}", bdm_id, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::geo::calculate_distance;

    // Desplazamiento en grados de latitud que corresponde a N metros
    fn lat_offset(meters: f64) -> f64 {
        meters / 111_195.0
    }

    #[test]
    fn test_distance_gate_rejects_eleven_meters_at_ten() {
        let seuil = 10.0;
        let d = calculate_distance(5.3268, -4.0227, 5.3268 + lat_offset(11.0), -4.0227);
        assert!(!(d <= seuil), "distance = {} m", d);
    }

    #[test]
    fn test_distance_gate_accepts_nine_meters_at_ten() {
        let seuil = 10.0;
        let d = calculate_distance(5.3268, -4.0227, 5.3268 + lat_offset(9.0), -4.0227);
        assert!(d <= seuil, "distance = {} m", d);
    }

    #[test]
    fn test_distance_gate_rejects_nan() {
        // Coordenadas no finitas nunca pasan la barrera
        let seuil = 10.0;
        let d = calculate_distance(f64::NAN, -4.0227, 5.3268, -4.0227);
        assert!(!(d <= seuil));
    }
}
