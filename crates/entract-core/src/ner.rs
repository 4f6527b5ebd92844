use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single token recognized by the entity model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// The token string, verbatim from the model. Non-aggregated models emit
    /// sub-word pieces (`##ing`); they are passed through unchanged.
    pub text: String,
    /// Model label, e.g. `B-PER` or `ORG`.
    pub label: String,
    pub score: f32,
}

#[derive(Error, Debug)]
pub enum NerError {
    #[error("connection to inference endpoint failed: {0}")]
    Connection(String),
    #[error("inference API error: {0}")]
    Api(String),
    #[error("failed to parse inference response: {0}")]
    Parse(String),
}

/// Trait for pluggable entity-recognition backends.
///
/// The model is a pretrained black box; implementors only move text in and
/// entities out, in model order.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    async fn recognize(&self, text: &str) -> Result<Vec<Entity>, NerError>;
}
