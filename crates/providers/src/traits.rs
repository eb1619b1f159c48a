use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pricing {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub completion: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Architecture {
    #[serde(default)]
    pub modality: String,
    #[serde(default)]
    pub output_modalities: Vec<String>,
}

/// One model entry from the provider's `/models` catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub architecture: Architecture,
}

/// Seam between the agent and the remote LLM service.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// One chat-completion request against a single model. No retries
    /// here; failover across models is the agent's job.
    async fn chat(
        &self,
        model: &str,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, ProviderError>;

    /// Fetch the full model catalog.
    async fn list_catalog(&self) -> Result<Vec<CatalogEntry>, ProviderError>;
}
