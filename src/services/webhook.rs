//! Run-summary webhook
//!
//! Posts the summary of each run to an operator-configured endpoint so the
//! job can be watched without scraping logs. Delivery failures are logged and
//! never fail the run.

use tracing::{debug, warn};
use url::Url;

use crate::services::report_service::RunSummary;

/// Optional HTTP notifier for run summaries.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: Option<Url>,
}

impl WebhookNotifier {
    /// Build a notifier for the configured endpoint, if any.
    pub fn new(endpoint: Option<&str>) -> Result<Self, url::ParseError> {
        let endpoint = endpoint.map(Url::parse).transpose()?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    /// A notifier that never sends anything.
    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: None,
        }
    }

    /// Deliver the run summary. Best effort only.
    pub async fn notify(&self, summary: &RunSummary) {
        let Some(url) = &self.endpoint else {
            return;
        };

        match self.client.post(url.clone()).json(summary).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(run_id = %summary.run_id, "run summary webhook delivered");
            }
            Ok(response) => {
                warn!(
                    run_id = %summary.run_id,
                    status = %response.status(),
                    "run summary webhook rejected"
                );
            }
            Err(error) => {
                warn!(run_id = %summary.run_id, error = %error, "run summary webhook failed");
            }
        }
    }
}
