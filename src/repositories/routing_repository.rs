//! Repositorio de routings y resolución del plan aplicable
//!
//! El resolver es de solo lectura. La unicidad del plan par défaut por
//! agent la garantiza el índice parcial del schema, no un check-then-act
//! en la aplicación.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::dto::routing_dto::RoutingSelector;
use crate::models::routing::{Routing, DEFAULT_ROUTING_DESCRIPTION};
use crate::utils::errors::AppError;

pub struct RoutingRepository {
    pool: PgPool,
}

impl RoutingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Routing>, AppError> {
        let routing = sqlx::query_as::<_, Routing>("SELECT * FROM routing WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(routing)
    }

    /// Plan par défaut del agent (a lo sumo uno, por índice parcial)
    pub async fn find_default_for_agent(&self, agent_id: i32) -> Result<Option<Routing>, AppError> {
        let routing = sqlx::query_as::<_, Routing>(
            "SELECT * FROM routing WHERE description_routing = $1 AND agent_routing_id = $2",
        )
        .bind(DEFAULT_ROUTING_DESCRIPTION)
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(routing)
    }

    /// Resolver el routing aplicable a una visite
    pub async fn resolve(
        &self,
        agent_id: i32,
        selector: RoutingSelector,
    ) -> Result<Option<Routing>, AppError> {
        match selector {
            RoutingSelector::Explicit(id) => self.find_by_id(id).await,
            RoutingSelector::UseDefault => self.find_default_for_agent(agent_id).await,
        }
    }

    pub async fn create(
        &self,
        description: &str,
        date_debut: DateTime<Utc>,
        date_fin: DateTime<Utc>,
        pm_routing: &str,
        agent_id: i32,
        bdm_id: i32,
    ) -> Result<Routing, AppError> {
        let result = sqlx::query_as::<_, Routing>(
            r#"
            INSERT INTO routing (description_routing, date_debut_routing, date_fin_routing, pm_routing, agent_routing_id, bdm_routing_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(description)
        .bind(date_debut)
        .bind(date_fin)
        .bind(pm_routing)
        .bind(agent_id)
        .bind(bdm_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(routing) => Ok(routing),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
                "Cet agent a déjà un routing par défaut".to_string(),
            )),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    pub async fn find_by_agent(&self, agent_id: i32) -> Result<Vec<Routing>, AppError> {
        let routings = sqlx::query_as::<_, Routing>(
            "SELECT * FROM routing WHERE agent_routing_id = $1 ORDER BY created_at DESC",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(routings)
    }

    pub async fn find_by_bdm(&self, bdm_id: i32) -> Result<Vec<Routing>, AppError> {
        let routings = sqlx::query_as::<_, Routing>(
            "SELECT * FROM routing WHERE bdm_routing_id = $1 ORDER BY created_at DESC",
        )
        .bind(bdm_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(routings)
    }

    /// Routings creados en la ventana, limitados a la población de agents
    /// del reporte. Devuelve `sqlx::Error` crudo para que el caller lo
    /// envuelva en el reintento acotado.
    pub async fn created_between_for_agents(
        &self,
        agent_ids: &[i32],
        debut: DateTime<Utc>,
        fin: DateTime<Utc>,
    ) -> Result<Vec<Routing>, sqlx::Error> {
        sqlx::query_as::<_, Routing>(
            r#"
            SELECT * FROM routing
            WHERE agent_routing_id = ANY($1) AND created_at >= $2 AND created_at <= $3
            ORDER BY created_at
            "#,
        )
        .bind(agent_ids)
        .bind(debut)
        .bind(fin)
        .fetch_all(&self.pool)
        .await
    }
}
