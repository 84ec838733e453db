mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;

use config::environment::EnvironmentConfig;
use middleware::cors::cors_middleware;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🛰️ TPE Field Ops - Suivi terrain des points marchands");
    info!("=====================================================");

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let config = EnvironmentConfig::from_env();
    let port = config.port;

    // CORS: permisivo en desarrollo, orígenes explícitos si están configurados
    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        middleware::cors::cors_middleware_with_origins(config.cors_origins.clone())
    };

    let app_state = AppState::new(pool, config);

    let app = Router::new()
        .nest("/api/routine", routes::routine_routes::create_routine_router())
        .nest("/api/routing", routes::routing_routes::create_routing_router())
        .nest("/api/report", routes::report_routes::create_report_router())
        .nest("/api/pm", routes::merchant_routes::create_merchant_router())
        .nest("/api/agent", routes::agent_routes::create_agent_router())
        .nest("/api/livraison", routes::livraison_routes::create_livraison_router())
        .nest("/api/users", routes::user_routes::create_user_router())
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("📋 Routines:");
    info!("   POST /api/routine/makeRoutine - Enregistrer une visite");
    info!("   GET  /api/routine/routines - Toutes les routines");
    info!("   POST /api/routine/getRoutineByCommercial - Routines d'un agent");
    info!("   POST /api/routine/importBase64File - Relais d'upload d'image");
    info!("🗺️ Routings:");
    info!("   POST /api/routing/createRouting - Créer un routing");
    info!("   POST /api/routing/getRoutingByCommercial - Routings d'un agent");
    info!("   POST /api/routing/getAllRoutingsByBdm - Routings d'un BDM");
    info!("📊 Reporting:");
    info!("   POST /api/report/bdm - Résumé par agent d'un BDM");
    info!("   POST /api/report/direction - Résumé agence (direction)");
    info!("   GET  /api/report/stream - Flux SSE des rapports");
    info!("📍 Points marchands:");
    info!("   GET  /api/pm/pms - Liste des points marchands");
    info!("   POST /api/pm/nearby - Points marchands à proximité");
    info!("   POST /api/pm/updateMerchant - Créer/corriger un point marchand");
    info!("   POST /api/pm/getSnByPointMarchand - Numéros de série d'un PM");
    info!("👤 Agents:");
    info!("   POST /api/agent/generateAuthCode - Générer un code d'autorisation");
    info!("   POST /api/agent/validateAuthCode - Valider un code");
    info!("   POST /api/agent/getMyAgents - Agents d'un BDM");
    info!("   POST /api/agent/getProfile - Profil d'un agent");
    info!("📦 Livraisons:");
    info!("   POST /api/livraison - Enregistrer une livraison");
    info!("   GET  /api/livraison - Toutes les livraisons");
    info!("   GET  /api/livraison/:id - Une livraison");
    info!("   PUT  /api/livraison/:id/valider - Valider une livraison");
    info!("🔑 Users:");
    info!("   POST /api/users/register - Inscription");
    info!("   POST /api/users/login - Connexion");

    // Iniciar servidor con apagado graceful
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
