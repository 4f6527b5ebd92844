//! HTTP client for a hosted token-classification model.
//!
//! Speaks the Hugging Face inference wire format: `POST {endpoint}/models/{model}`
//! with `{"inputs": <text>}`; the response is a JSON array of recognized
//! tokens. The model itself is a pretrained black box — this crate only moves
//! text in and entities out.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use entract_core::{Entity, EntityRecognizer, NerError};

/// Configuration for the NER inference client.
#[derive(Debug, Clone)]
pub struct NerConfig {
    /// Inference endpoint base URL.
    pub endpoint: String,
    /// Model id, e.g. `dslim/bert-base-NER`.
    pub model: String,
    /// Optional bearer token for hosted endpoints.
    pub api_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co".to_string(),
            model: "dslim/bert-base-NER".to_string(),
            api_token: None,
            timeout_secs: 120,
        }
    }
}

impl NerConfig {
    /// Build from the environment (`ENTRACT_NER_ENDPOINT`, `ENTRACT_NER_MODEL`,
    /// `ENTRACT_NER_TOKEN`), falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var("ENTRACT_NER_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("ENTRACT_NER_MODEL") {
            config.model = model;
        }
        config.api_token = std::env::var("ENTRACT_NER_TOKEN").ok();
        config
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

/// Inference API request body.
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Wire format of one recognized token.
///
/// Non-aggregated pipelines emit `entity` (`B-PER`, `I-ORG`, …) per sub-word
/// token; aggregated ones emit `entity_group` per merged span.
#[derive(Debug, Deserialize)]
struct TokenJson {
    word: String,
    #[serde(alias = "entity_group")]
    entity: String,
    score: f32,
}

/// NER client over HTTP.
pub struct NerClient {
    config: NerConfig,
    client: Client,
}

impl NerClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NerConfig) -> Result<Self, NerError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NerError::Connection(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &NerConfig {
        &self.config
    }

    fn model_url(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl EntityRecognizer for NerClient {
    async fn recognize(&self, text: &str) -> Result<Vec<Entity>, NerError> {
        let mut request = self
            .client
            .post(self.model_url())
            .json(&InferenceRequest { inputs: text });
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NerError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NerError::Api(format!("HTTP {status}: {body}")));
        }

        let tokens: Vec<TokenJson> = response
            .json()
            .await
            .map_err(|e| NerError::Parse(e.to_string()))?;
        debug!(tokens = tokens.len(), "entity recognition complete");

        Ok(tokens
            .into_iter()
            .map(|t| Entity {
                text: t.word,
                label: t.entity,
                score: t.score,
            })
            .collect())
    }
}
