//! Optional LLM pass over an aggregated [`BrandInsights`] record.
//!
//! One request to an OpenAI-compatible `/chat/completions` endpoint rewrites
//! the brand context and FAQs and infers payment methods and currencies. Any
//! failure leaves the record exactly as it was.

pub mod error;

mod prompt;
mod response;

use std::time::Duration;

use serde_json::Value;
use storelens_core::{BrandInsights, LlmConfig};

pub use error::EnhancerError;

#[derive(Debug, Clone)]
pub struct Enhancer {
    client: reqwest::Client,
    config: LlmConfig,
}

impl Enhancer {
    /// Builds an enhancer from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EnhancerError::Disabled`] when no API key is configured and
    /// [`EnhancerError::Http`] if the HTTP client cannot be built.
    pub fn new(config: LlmConfig) -> Result<Self, EnhancerError> {
        if !config.is_enabled() {
            return Err(EnhancerError::Disabled);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Enhances `record`, returning it unchanged on any failure.
    pub async fn enhance(&self, record: BrandInsights) -> BrandInsights {
        match self.try_enhance(&record).await {
            Ok(enhanced) => {
                tracing::info!(
                    store_url = %record.store_url,
                    model = %self.config.model,
                    "record enhanced"
                );
                enhanced
            }
            Err(e) => {
                tracing::warn!(
                    store_url = %record.store_url,
                    error = %e,
                    "LLM enhancement failed; keeping raw record"
                );
                record
            }
        }
    }

    /// Enhances a copy of `record`.
    ///
    /// # Errors
    ///
    /// - [`EnhancerError::Disabled`] when no API key is configured.
    /// - [`EnhancerError::Http`] for network failures and timeouts.
    /// - [`EnhancerError::UnexpectedStatus`] for a non-2xx reply.
    /// - [`EnhancerError::EmptyResponse`] when the reply has no message.
    /// - [`EnhancerError::Malformed`] when the message is not the requested JSON.
    pub async fn try_enhance(&self, record: &BrandInsights) -> Result<BrandInsights, EnhancerError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(EnhancerError::Disabled)?;
        let url = format!("{}/chat/completions", self.config.base_url);

        let reply = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&prompt::request_body(&self.config.model, record))
            .send()
            .await?;
        let status = reply.status();
        if !status.is_success() {
            return Err(EnhancerError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let completion: Value = reply.json().await?;
        let content = response::message_content(&completion)?;
        let enhancement = response::parse_enhancement(content)?;
        Ok(response::apply(record.clone(), enhancement))
    }
}
