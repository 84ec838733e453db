//! Rutas del reporting terrain
//!
//! El reporte se sirve síncrono y además se difunde por SSE a los
//! supervisores conectados.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use tokio::sync::broadcast;

use crate::controllers::report_controller::ReportController;
use crate::dto::report_dto::{
    AgentReportSummary, ReportByBdmRequest, ReportDirectionRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new()
        .route("/bdm", post(report_by_bdm))
        .route("/direction", post(report_direction))
        .route("/stream", get(stream_reports))
}

async fn report_by_bdm(
    State(state): State<AppState>,
    Json(request): Json<ReportByBdmRequest>,
) -> Result<Json<Vec<AgentReportSummary>>, AppError> {
    let controller = ReportController::new(&state);
    let response = controller.report_by_bdm(request).await?;
    Ok(Json(response))
}

async fn report_direction(
    State(state): State<AppState>,
    Json(request): Json<ReportDirectionRequest>,
) -> Result<Json<Vec<AgentReportSummary>>, AppError> {
    let controller = ReportController::new(&state);
    let response = controller.report_direction(request).await?;
    Ok(Json(response))
}

/// Canal en vivo: cada reporte generado llega como un evento SSE
async fn stream_reports(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.report_feed.subscribe();

    let stream = futures::stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(report) => match Event::default().json_data(&report) {
                    Ok(event) => return Some((Ok::<Event, Infallible>(event), receiver)),
                    Err(e) => {
                        log::warn!("⚠️ Reporte no serializable para SSE: {}", e);
                        continue;
                    }
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("⚠️ Suscriptor SSE retrasado: {} reporte(s) perdidos", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
