use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the leak classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Classifier returned error: {0}")]
    Api(String),
}

/// Classifier for off-platform contact-information sharing
///
/// Flags messages that look like they carry phone numbers, emails or social
/// handles. A positive verdict dissolves the match.
#[async_trait]
pub trait LeakClassifier: Send + Sync {
    async fn classify_leak(&self, text: &str) -> Result<bool, ClassifierError>;
}

#[derive(Debug, Deserialize)]
struct Verdict {
    flagged: bool,
}

/// HTTP client for the external moderation endpoint
pub struct HttpLeakClassifier {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl HttpLeakClassifier {
    pub fn new(endpoint: String, api_key: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            endpoint,
            api_key,
            client,
        }
    }
}

#[async_trait]
impl LeakClassifier for HttpLeakClassifier {
    async fn classify_leak(&self, text: &str) -> Result<bool, ClassifierError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api(format!("status {}: {}", status, body)));
        }

        let verdict: Verdict = response.json().await?;
        tracing::debug!("Classifier verdict: flagged={}", verdict.flagged);

        Ok(verdict.flagged)
    }
}
