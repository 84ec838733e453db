//! Repositorio de routines (visites) y sus TPE observados
//!
//! Las escrituras van siempre dentro de la transacción abierta por el
//! workflow de visite: la routine y todas sus filas tpe_routine se
//! confirman juntas o no se confirma nada.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::dto::routine_dto::RoutineWithTpes;
use crate::models::routine::{Routine, TpeRoutine};
use crate::utils::errors::AppError;

pub struct NewRoutine<'a> {
    pub numero_routine: &'a str,
    pub point_marchand: &'a str,
    pub veille_concurrentielle: Option<&'a str>,
    pub commentaire: Option<&'a str>,
    pub latitude_marchand: f64,
    pub longitude_marchand: f64,
    pub commercial_id: i32,
    pub routing_id: i32,
}

pub struct NewTpeRoutine<'a> {
    pub id_terminal: &'a str,
    pub etat_tpe: &'a str,
    pub etat_chargeur: &'a str,
    pub probleme_bancaire: bool,
    pub description_probleme_bancaire: Option<&'a str>,
    pub probleme_mobile: bool,
    pub description_probleme_mobile: Option<&'a str>,
    pub commentaire: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

pub struct RoutineRepository {
    pool: PgPool,
}

impl RoutineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_routine(
        &self,
        conn: &mut PgConnection,
        routine: NewRoutine<'_>,
    ) -> Result<Routine, sqlx::Error> {
        sqlx::query_as::<_, Routine>(
            r#"
            INSERT INTO routine (numero_routine, date_routine, point_marchand_routine, veille_concurentielle_routine, commentaire_routine, latitude_marchand_routine, longitude_marchand_routine, commercial_routine_id, routing_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(routine.numero_routine)
        .bind(Utc::now())
        .bind(routine.point_marchand)
        .bind(routine.veille_concurrentielle)
        .bind(routine.commentaire)
        .bind(routine.latitude_marchand)
        .bind(routine.longitude_marchand)
        .bind(routine.commercial_id)
        .bind(routine.routing_id)
        .fetch_one(conn)
        .await
    }

    pub async fn insert_tpe_routine(
        &self,
        conn: &mut PgConnection,
        routine_id: i32,
        tpe: NewTpeRoutine<'_>,
    ) -> Result<TpeRoutine, sqlx::Error> {
        sqlx::query_as::<_, TpeRoutine>(
            r#"
            INSERT INTO tpe_routine (id_terminal_tpe_routine, etat_tpe_routine, etat_chargeur_tpe_routine, probleme_bancaire, description_probleme_bancaire, probleme_mobile, description_probleme_mobile, commentaire_tpe_routine, image_tpe_routine, routine_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(tpe.id_terminal)
        .bind(tpe.etat_tpe)
        .bind(tpe.etat_chargeur)
        .bind(tpe.probleme_bancaire)
        .bind(tpe.description_probleme_bancaire)
        .bind(tpe.probleme_mobile)
        .bind(tpe.description_probleme_mobile)
        .bind(tpe.commentaire)
        .bind(tpe.image_url)
        .bind(routine_id)
        .fetch_one(conn)
        .await
    }

    pub async fn find_all_with_tpes(&self) -> Result<Vec<RoutineWithTpes>, AppError> {
        let routines = sqlx::query_as::<_, Routine>(
            "SELECT * FROM routine ORDER BY date_routine DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        self.attach_tpes(routines).await
    }

    pub async fn find_by_commercial_with_tpes(
        &self,
        agent_id: i32,
    ) -> Result<Vec<RoutineWithTpes>, AppError> {
        let routines = sqlx::query_as::<_, Routine>(
            "SELECT * FROM routine WHERE commercial_routine_id = $1 ORDER BY date_routine DESC",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_tpes(routines).await
    }

    pub async fn find_tpes_of_routine(&self, routine_id: i32) -> Result<Vec<TpeRoutine>, AppError> {
        let tpes = sqlx::query_as::<_, TpeRoutine>(
            "SELECT * FROM tpe_routine WHERE routine_id = $1 ORDER BY id",
        )
        .bind(routine_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tpes)
    }

    /// Routines de la ventana de reporting, limitadas a la población pedida.
    /// Devuelve `sqlx::Error` crudo para el reintento acotado del caller.
    pub async fn between_for_agents(
        &self,
        agent_ids: &[i32],
        debut: DateTime<Utc>,
        fin: DateTime<Utc>,
    ) -> Result<Vec<Routine>, sqlx::Error> {
        sqlx::query_as::<_, Routine>(
            r#"
            SELECT * FROM routine
            WHERE commercial_routine_id = ANY($1) AND date_routine >= $2 AND date_routine <= $3
            ORDER BY date_routine
            "#,
        )
        .bind(agent_ids)
        .bind(debut)
        .bind(fin)
        .fetch_all(&self.pool)
        .await
    }

    async fn attach_tpes(
        &self,
        routines: Vec<Routine>,
    ) -> Result<Vec<RoutineWithTpes>, AppError> {
        let ids: Vec<i32> = routines.iter().map(|r| r.id).collect();
        let mut tpes = sqlx::query_as::<_, TpeRoutine>(
            "SELECT * FROM tpe_routine WHERE routine_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut result: Vec<RoutineWithTpes> = routines
            .into_iter()
            .map(|routine| RoutineWithTpes {
                routine,
                tpe_routine: Vec::new(),
            })
            .collect();

        // Reparto en memoria para evitar un query por routine
        for tpe in tpes.drain(..) {
            if let Some(entry) = result
                .iter_mut()
                .find(|r| r.routine.id == tpe.routine_id)
            {
                entry.tpe_routine.push(tpe);
            }
        }

        Ok(result)
    }
}
