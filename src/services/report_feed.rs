//! Canal en vivo de reportes
//!
//! Difusión best-effort de cada reporte generado a los suscriptores
//! conectados (SSE). Publicar sin suscriptores no es un error.

use tokio::sync::broadcast;

use crate::dto::report_dto::ReportEvent;

const FEED_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct ReportFeed {
    sender: broadcast::Sender<ReportEvent>,
}

impl ReportFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    /// Publicar un reporte; nunca falla hacia el caller
    pub fn publish(&self, event: ReportEvent) {
        match self.sender.send(event) {
            Ok(subscribers) => {
                log::debug!("📡 Reporte difundido a {} suscriptor(es)", subscribers)
            }
            Err(_) => log::debug!("📡 Reporte generado sin suscriptores en vivo"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReportEvent> {
        self.sender.subscribe()
    }
}

impl Default for ReportFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event() -> ReportEvent {
        ReportEvent {
            scope: "bdm:2".to_string(),
            genere_le: Utc::now(),
            date_debut: Utc::now(),
            date_fin: Utc::now(),
            resumes: vec![],
        }
    }

    #[test]
    fn test_publish_without_subscribers_does_not_panic() {
        let feed = ReportFeed::new();
        feed.publish(event());
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let feed = ReportFeed::new();
        let mut rx = feed.subscribe();
        feed.publish(event());
        let received = rx.recv().await.unwrap();
        assert_eq!(received.scope, "bdm:2");
    }
}
