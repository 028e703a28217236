use crate::config::EndpointConfig;
use crate::error::{RecipeError, Result};
use crate::providers::GenerativeEndpoint;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;

/// Client for the hosted worker that fronts the language model.
///
/// The worker takes `{"prompt": ..., "max_tokens": ...}` and answers with a
/// JSON object whose `response_field` holds the recipe.
pub struct WorkerEndpoint {
    client: Client,
    base_url: String,
    max_tokens: u32,
    response_field: String,
}

impl WorkerEndpoint {
    /// Create a worker client from configuration
    pub fn new(config: &EndpointConfig) -> Result<Self> {
        Self::with_timeout(config, Duration::from_secs(config.timeout))
    }

    pub fn with_timeout(config: &EndpointConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(WorkerEndpoint {
            client,
            base_url: config.base_url.clone(),
            max_tokens: config.max_tokens,
            response_field: config.response_field.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let defaults = EndpointConfig::default();
        WorkerEndpoint {
            client: Client::new(),
            base_url: base_url.into(),
            max_tokens: defaults.max_tokens,
            response_field: defaults.response_field,
        }
    }
}

#[async_trait]
impl GenerativeEndpoint for WorkerEndpoint {
    fn endpoint_name(&self) -> &str {
        "worker"
    }

    fn response_field(&self) -> &str {
        &self.response_field
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(
            "Sending {} character prompt to {}",
            prompt.chars().count(),
            self.base_url
        );

        let response = self
            .client
            .post(&self.base_url)
            .json(&json!({
                "prompt": prompt,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Endpoint {} returned HTTP {}", self.base_url, status);
            return Err(RecipeError::ServerError(status.as_u16()));
        }

        let body = response.bytes().await?;
        let text = String::from_utf8(body.to_vec())
            .map_err(|e| RecipeError::InvalidResponse(format!("response is not UTF-8: {e}")))?;

        debug!("Endpoint returned {} bytes", text.len());
        Ok(text)
    }
}
