//! Forwarding confirmed leads to the backend.
//!
//! When `relay.lead_webhook_url` is configured, every confirmed lead is POSTed
//! there as JSON. Delivery is best-effort: failures are logged and the caller
//! still hears the farewell.
//!
//! Deliveries run in the background on a [`TaskTracker`] so the farewell is
//! not delayed. On shutdown [`LeadNotifier::drain`] waits for them, bounded by
//! the webhook timeout.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::task::TaskTracker;
use tracing::Instrument;
use uuid::Uuid;

use super::session::{Lead, Role};
use crate::config::{RelayConfig, LEAD_DRAIN_MARGIN_MS};

/// JSON body posted to the lead webhook
#[derive(Debug, Clone, Serialize)]
pub struct LeadSubmission {
    pub session_id: Uuid,
    pub role: Option<Role>,
    pub city: String,
    pub name: String,
    pub phone: String,
    pub captured_at: DateTime<Utc>,
}

impl LeadSubmission {
    pub fn new(session_id: Uuid, lead: Lead) -> Self {
        Self {
            session_id,
            role: lead.role,
            city: lead.city,
            name: lead.name,
            phone: lead.phone,
            captured_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    #[error("Failed to create HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("Lead webhook request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Lead webhook returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Delivers confirmed leads. Cheap to clone; clones share the connection
/// pool and the set of in-flight deliveries.
#[derive(Clone, Debug)]
pub struct LeadNotifier {
    webhook_url: Option<String>,
    http_client: reqwest::Client,
    deliveries: TaskTracker,
    drain_timeout: Duration,
}

impl LeadNotifier {
    pub fn new(config: &RelayConfig) -> Result<Self, LeadError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.lead_webhook_timeout_ms))
            .build()
            .map_err(LeadError::Client)?;

        Ok(Self {
            webhook_url: config.lead_webhook_url.clone(),
            http_client,
            deliveries: TaskTracker::new(),
            drain_timeout: Duration::from_millis(
                config.lead_webhook_timeout_ms + LEAD_DRAIN_MARGIN_MS,
            ),
        })
    }

    pub fn webhook_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Deliver a lead in the background, within the caller's span.
    pub fn submit(&self, submission: LeadSubmission) {
        let notifier = self.clone();
        self.deliveries
            .spawn(async move { notifier.notify(&submission).await }.in_current_span());
    }

    /// Wait for background deliveries to finish. Called once the server has
    /// stopped, so no new leads can arrive.
    pub async fn drain(&self) {
        self.deliveries.close();

        let pending = self.deliveries.len();
        if pending == 0 {
            return;
        }

        tracing::info!(pending, "Waiting for lead deliveries to finish");
        if tokio::time::timeout(self.drain_timeout, self.deliveries.wait())
            .await
            .is_err()
        {
            tracing::warn!(
                pending = self.deliveries.len(),
                "Lead deliveries abandoned at shutdown"
            );
        }
    }

    /// Submit a lead, logging instead of failing.
    pub async fn notify(&self, submission: &LeadSubmission) {
        tracing::info!(
            session_id = %submission.session_id,
            role = ?submission.role,
            city = %submission.city,
            "Lead confirmed"
        );

        if let Err(e) = self.send(submission).await {
            tracing::warn!(
                session_id = %submission.session_id,
                error = %e,
                "Failed to deliver lead to webhook"
            );
        }
    }

    async fn send(&self, submission: &LeadSubmission) -> Result<(), LeadError> {
        let Some(url) = self.webhook_url.as_deref() else {
            tracing::debug!("No lead webhook configured, skipping delivery");
            return Ok(());
        };

        let response = self.http_client.post(url).json(submission).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LeadError::Status(status));
        }

        tracing::debug!(%status, "Lead delivered to webhook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, routing::post, Router};

    /// Serve a webhook answering `status` after `delay`, counting requests.
    async fn spawn_webhook(status: StatusCode, delay: Duration) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/leads",
                post(move |State(hits): State<Arc<AtomicUsize>>| async move {
                    tokio::time::sleep(delay).await;
                    hits.fetch_add(1, Ordering::SeqCst);
                    status
                }),
            )
            .with_state(hits.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/leads", addr), hits)
    }

    fn webhook_config(url: String) -> RelayConfig {
        RelayConfig {
            lead_webhook_url: Some(url),
            ..RelayConfig::default()
        }
    }

    fn sample_lead() -> Lead {
        Lead {
            role: Some(Role::Tenant),
            city: "Granada".to_string(),
            name: "Lucía Martín".to_string(),
            phone: "+34600111222".to_string(),
        }
    }

    #[test]
    fn test_submission_serializes_role_in_spanish() {
        let submission = LeadSubmission::new(Uuid::new_v4(), sample_lead());
        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["role"], "inquilino");
        assert_eq!(value["city"], "Granada");
        assert_eq!(value["phone"], "+34600111222");
        assert!(value["captured_at"].is_string());
    }

    #[test]
    fn test_webhook_disabled_by_default() {
        let notifier = LeadNotifier::new(&RelayConfig::default()).unwrap();
        assert!(!notifier.webhook_enabled());
    }

    #[tokio::test]
    async fn test_send_without_webhook_is_noop() {
        let notifier = LeadNotifier::new(&RelayConfig::default()).unwrap();
        let submission = LeadSubmission::new(Uuid::new_v4(), sample_lead());
        assert!(notifier.send(&submission).await.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_webhook_is_error() {
        let config = RelayConfig {
            lead_webhook_url: Some("http://127.0.0.1:1/leads".to_string()),
            lead_webhook_timeout_ms: 200,
            ..RelayConfig::default()
        };
        let notifier = LeadNotifier::new(&config).unwrap();
        let submission = LeadSubmission::new(Uuid::new_v4(), sample_lead());
        assert!(matches!(
            notifier.send(&submission).await,
            Err(LeadError::Request(_))
        ));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let (url, hits) =
            spawn_webhook(StatusCode::INTERNAL_SERVER_ERROR, Duration::ZERO).await;
        let notifier = LeadNotifier::new(&webhook_config(url)).unwrap();
        let submission = LeadSubmission::new(Uuid::new_v4(), sample_lead());

        match notifier.send(&submission).await {
            Err(LeadError::Status(status)) => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR)
            }
            other => panic!("expected status error, got {:?}", other),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drain_waits_for_background_delivery() {
        let (url, hits) = spawn_webhook(StatusCode::OK, Duration::from_millis(300)).await;
        let notifier = LeadNotifier::new(&webhook_config(url)).unwrap();

        notifier.submit(LeadSubmission::new(Uuid::new_v4(), sample_lead()));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        notifier.drain().await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drain_is_bounded_by_webhook_timeout() {
        let (url, _hits) = spawn_webhook(StatusCode::OK, Duration::from_secs(10)).await;
        let config = RelayConfig {
            lead_webhook_timeout_ms: 100,
            ..webhook_config(url)
        };
        let notifier = LeadNotifier::new(&config).unwrap();

        notifier.submit(LeadSubmission::new(Uuid::new_v4(), sample_lead()));
        tokio::time::timeout(Duration::from_secs(5), notifier.drain())
            .await
            .expect("drain should finish once the request times out");
    }

    #[tokio::test]
    async fn test_drain_without_deliveries() {
        let notifier = LeadNotifier::new(&RelayConfig::default()).unwrap();
        notifier.drain().await;
    }
}
