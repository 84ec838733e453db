//! Repositorio de agents, BDM y zones commerciales

use sqlx::PgPool;

use crate::models::agent::{Agent, Bdm};
use crate::utils::errors::AppError;

pub struct AgentRepository {
    pool: PgPool,
}

impl AgentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Agent>, AppError> {
        let agent = sqlx::query_as::<_, Agent>("SELECT * FROM agent WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(agent)
    }

    pub async fn find_by_bdm(&self, bdm_id: i32) -> Result<Vec<Agent>, AppError> {
        let agents = sqlx::query_as::<_, Agent>(
            "SELECT * FROM agent WHERE responsable_agent_id = $1 ORDER BY nom_agent",
        )
        .bind(bdm_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(agents)
    }

    /// Población de agents para la vista dirección: todos salvo los que
    /// tienen una cuenta con rol privilegiado
    pub async fn find_all_excluding_role(&self, role_id: i32) -> Result<Vec<Agent>, AppError> {
        let agents = sqlx::query_as::<_, Agent>(
            r#"
            SELECT * FROM agent
            WHERE id NOT IN (SELECT agent_user_id FROM users WHERE role_user_id = $1)
            ORDER BY nom_agent
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(agents)
    }

    /// Agents asignados a una zona comercial (por nombre de zona)
    pub async fn find_by_zone_name(&self, nom_zone: &str) -> Result<Vec<Agent>, AppError> {
        let agents = sqlx::query_as::<_, Agent>(
            r#"
            SELECT agent.* FROM agent
            INNER JOIN zone_commerciale ON agent.zone_commerciale_id = zone_commerciale.id
            WHERE zone_commerciale.nom_zone = $1
            "#,
        )
        .bind(nom_zone)
        .fetch_all(&self.pool)
        .await?;

        Ok(agents)
    }

    pub async fn set_auth_code(&self, agent_id: i32, code: &str) -> Result<Agent, AppError> {
        let agent = sqlx::query_as::<_, Agent>(
            "UPDATE agent SET code_authorisation_agent = $2 WHERE id = $1 RETURNING *",
        )
        .bind(agent_id)
        .bind(code)
        .fetch_one(&self.pool)
        .await?;

        Ok(agent)
    }

    pub async fn find_bdm_by_id(&self, id: i32) -> Result<Option<Bdm>, AppError> {
        let bdm = sqlx::query_as::<_, Bdm>("SELECT * FROM bdm WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bdm)
    }
}
