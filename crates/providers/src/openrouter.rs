use crate::traits::{CatalogEntry, ChatProvider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const CHAT_TIMEOUT: Duration = Duration::from_secs(30);
const CATALOG_TIMEOUT: Duration = Duration::from_secs(20);
const DEFAULT_MODELS_URL: &str = "https://openrouter.ai/api/v1/models";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    data: Vec<CatalogEntry>,
}

/// OpenRouter HTTP client. One request per call, fixed timeouts,
/// bearer auth; all failures come back as `ProviderError` values.
pub struct OpenRouterClient {
    client: Client,
    api_url: String,
    models_url: String,
    api_key: String,
}

impl OpenRouterClient {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            models_url: DEFAULT_MODELS_URL.to_string(),
            api_key,
        }
    }

    pub fn with_models_url(mut self, models_url: String) -> Self {
        self.models_url = models_url;
        self
    }
}

#[async_trait]
impl ChatProvider for OpenRouterClient {
    async fn chat(
        &self,
        model: &str,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, ProviderError> {
        let body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_text },
            ],
            "temperature": 0.2,
        });

        debug!(model, url = %self.api_url, "chat completion request");

        let response = self
            .client
            .post(&self.api_url)
            .timeout(CHAT_TIMEOUT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Parse("No choices in response".to_string()))
    }

    async fn list_catalog(&self) -> Result<Vec<CatalogEntry>, ProviderError> {
        debug!(url = %self.models_url, "model catalog fetch");

        let response = self
            .client
            .get(&self.models_url)
            .timeout(CATALOG_TIMEOUT)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let parsed: CatalogResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(parsed.data)
    }
}
