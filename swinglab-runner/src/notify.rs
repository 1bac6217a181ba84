//! Notification — push the scan report to an external webhook.
//!
//! Scans run unattended, so delivery failures must never abort a run.
//! Callers log the error and keep the console/JSON output as the record.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(String),

    #[error("notification endpoint rejected the message (HTTP {status})")]
    Rejected { status: u16 },
}

/// A destination for scan notifications.
pub trait Notifier {
    /// Human-readable name for log lines.
    fn name(&self) -> &str;

    /// Deliver one message. `subject` is a short headline, `body` the report.
    fn publish(&self, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// POSTs the report as JSON to a configured URL.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::blocking::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");

        Self {
            url: url.into(),
            client,
        }
    }

    fn payload(subject: &str, body: &str) -> serde_json::Value {
        serde_json::json!({
            "subject": subject,
            "message": body,
        })
    }
}

impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    fn publish(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&Self::payload(subject, body))
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
