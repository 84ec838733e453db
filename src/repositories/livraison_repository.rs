//! Repositorio de livraisons de TPE

use chrono::Utc;
use sqlx::PgPool;

use crate::dto::livraison_dto::LivraisonWithTpes;
use crate::models::livraison::{Livraison, TpeLivraison, STATUT_EN_ATTENTE};
use crate::utils::errors::AppError;

pub struct LivraisonRepository {
    pool: PgPool,
}

impl LivraisonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear la livraison y sus numéros de série en una sola transacción
    pub async fn create_with_tpes(
        &self,
        numero: &str,
        agent_saisie: i32,
        serials: &[String],
    ) -> Result<LivraisonWithTpes, AppError> {
        let tpes_json = serde_json::to_string(serials)
            .map_err(|e| AppError::Internal(format!("Serialización de la lista TPE: {}", e)))?;

        let mut tx = self.pool.begin().await?;

        let livraison = sqlx::query_as::<_, Livraison>(
            r#"
            INSERT INTO livraison (numero_livraison, date_livraison, statut_livraison, tpes, agent_saisie_livraison_id, agent_validateur_livraison_id)
            VALUES ($1, $2, $3, $4, $5, NULL)
            RETURNING *
            "#,
        )
        .bind(numero)
        .bind(Utc::now())
        .bind(STATUT_EN_ATTENTE)
        .bind(&tpes_json)
        .bind(agent_saisie)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::Persistence(format!("Error creando la livraison: {}", e)))?;

        let mut tpe_rows = Vec::with_capacity(serials.len());
        for serial in serials {
            let row = sqlx::query_as::<_, TpeLivraison>(
                r#"
                INSERT INTO tpe_livraison (sn_tpe_livraison, livraison_id)
                VALUES ($1, $2)
                RETURNING *
                "#,
            )
            .bind(serial)
            .bind(livraison.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::Persistence(format!("Error registrando el TPE '{}': {}", serial, e))
            })?;
            tpe_rows.push(row);
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Persistence(format!("Error confirmando la livraison: {}", e)))?;

        Ok(LivraisonWithTpes {
            livraison,
            tpe_livraison: tpe_rows,
        })
    }

    pub async fn find_all(&self) -> Result<Vec<Livraison>, AppError> {
        let livraisons =
            sqlx::query_as::<_, Livraison>("SELECT * FROM livraison ORDER BY date_livraison DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(livraisons)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Livraison>, AppError> {
        let livraison = sqlx::query_as::<_, Livraison>("SELECT * FROM livraison WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(livraison)
    }

    pub async fn find_tpes_of_livraison(&self, id: i32) -> Result<Vec<TpeLivraison>, AppError> {
        let tpes = sqlx::query_as::<_, TpeLivraison>(
            "SELECT * FROM tpe_livraison WHERE livraison_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tpes)
    }

    pub async fn mark_validated(
        &self,
        id: i32,
        agent_validateur: i32,
        statut: &str,
    ) -> Result<Livraison, AppError> {
        let livraison = sqlx::query_as::<_, Livraison>(
            r#"
            UPDATE livraison
            SET agent_validateur_livraison_id = $2, statut_livraison = $3, date_livraison = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(agent_validateur)
        .bind(statut)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(livraison)
    }
}
