//! Repositorio de points marchands y del parque TPE

use chrono::Utc;
use sqlx::PgPool;

use crate::dto::merchant_dto::SerialNumberRow;
use crate::models::merchant::{Pm, GROUPE_SOFTPOS};
use crate::utils::errors::AppError;

pub struct MerchantRepository {
    pool: PgPool,
}

impl MerchantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Búsqueda por sous-chaîne, insensible a mayúsculas. Gana la primera
    /// coincidencia por id; los empates no se desambiguan.
    pub async fn find_first_by_name_like(&self, name: &str) -> Result<Option<Pm>, AppError> {
        let pattern = format!("%{}%", name);
        let pm = sqlx::query_as::<_, Pm>(
            "SELECT * FROM pm WHERE nom_pm ILIKE $1 ORDER BY id LIMIT 1",
        )
        .bind(pattern)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pm)
    }

    pub async fn exists_by_name(&self, name: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pm WHERE nom_pm = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn create(
        &self,
        nom_pm: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<Pm, AppError> {
        let pm = sqlx::query_as::<_, Pm>(
            r#"
            INSERT INTO pm (nom_pm, latitude_pm, longitude_pm, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(nom_pm)
        .bind(latitude)
        .bind(longitude)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(pm)
    }

    /// Listado terrain: se excluye el grupo reservado SOFTPOS
    pub async fn find_all_deployable(&self) -> Result<Vec<Pm>, AppError> {
        let pms = sqlx::query_as::<_, Pm>(
            "SELECT * FROM pm WHERE groupe_pm IS DISTINCT FROM $1 ORDER BY nom_pm",
        )
        .bind(GROUPE_SOFTPOS)
        .fetch_all(&self.pool)
        .await?;

        Ok(pms)
    }

    /// Numéros de série del parque desplegado en un point marchand
    pub async fn serials_by_merchant_like(
        &self,
        name: &str,
    ) -> Result<Vec<SerialNumberRow>, AppError> {
        let pattern = format!("%{}%", name);
        let serials = sqlx::query_as::<_, SerialNumberRow>(
            r#"
            SELECT tpe.serial_number_tpe FROM tpe
            INNER JOIN pm ON tpe.pm_id = pm.id
            WHERE pm.nom_pm ILIKE $1
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(serials)
    }

    /// Point marchand que aloja un terminal, por numéro de série
    pub async fn find_by_tpe_serial(&self, serial: &str) -> Result<Option<Pm>, AppError> {
        let pm = sqlx::query_as::<_, Pm>(
            r#"
            SELECT pm.* FROM pm
            INNER JOIN tpe ON tpe.pm_id = pm.id
            WHERE tpe.serial_number_tpe = $1
            "#,
        )
        .bind(serial)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pm)
    }
}
