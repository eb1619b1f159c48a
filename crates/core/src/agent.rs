//! The dispatch loop: fast path, then the remote LLM with automatic
//! failover across a ranked free-model list.

use crate::fast_path::fast_path;
use crate::interpreter::interpret_completion;
use crate::prompt::system_prompt;
use crate::types::AgentEvent;
use hana_providers::{rank_free_models, ChatProvider, ModelCache, ProviderError};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, warn};

pub const MISSING_KEY_MESSAGE: &str = "OPENROUTER_API_KEY is not set.";
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: check your OpenRouter API key.";
pub const PAYMENT_REQUIRED_MESSAGE: &str =
    "Payment required: check OpenRouter credits or model access.";
pub const NO_CONTACT_MESSAGE: &str = "Failed to contact OpenRouter.";

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub api_key: String,
    pub model: String,
    pub language: String,
}

pub struct Agent {
    provider: Arc<dyn ChatProvider>,
    settings: RwLock<AgentSettings>,
    cache: Mutex<ModelCache>,
}

impl Agent {
    pub fn new(provider: Arc<dyn ChatProvider>, settings: AgentSettings) -> Self {
        Self {
            provider,
            settings: RwLock::new(settings),
            cache: Mutex::new(ModelCache::new()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.settings.read().api_key.is_empty()
    }

    pub fn set_api_key(&self, api_key: String) {
        self.settings.write().api_key = api_key;
    }

    pub fn set_model(&self, model: String) {
        self.settings.write().model = model;
    }

    /// One user submission in, one event out. Never errors: every
    /// failure mode degrades to a `Reply` describing it.
    pub async fn process_text(&self, text: &str) -> AgentEvent {
        let settings = self.settings.read().clone();
        if settings.api_key.is_empty() {
            return AgentEvent::reply(MISSING_KEY_MESSAGE);
        }

        if let Some(event) = fast_path(text) {
            debug!("fast path matched, skipping LLM");
            return event;
        }

        let prompt = system_prompt(&settings.language);
        let models = self.candidate_models(&settings.model).await;
        let mut last_error: Option<String> = None;

        for model in &models {
            match self.provider.chat(model, &prompt, text).await {
                Ok(content) => {
                    let event = interpret_completion(&content);
                    // A reply-only result gets one more shot at local
                    // intent detection before we settle for it.
                    if !event.is_action() {
                        if let Some(action) = fast_path(text) {
                            return action;
                        }
                    }
                    return event;
                }
                // Key and billing problems cannot be fixed by trying
                // another model.
                Err(ProviderError::Status { code: 401, .. }) => {
                    return AgentEvent::reply(UNAUTHORIZED_MESSAGE);
                }
                Err(ProviderError::Status { code: 402, .. }) => {
                    return AgentEvent::reply(PAYMENT_REQUIRED_MESSAGE);
                }
                // Everything else is treated as transient and skipped;
                // continue-on-any-error keeps one flaky model from
                // taking the whole loop down.
                Err(e) => {
                    warn!(model = %model, error = %e, "model attempt failed, trying next");
                    last_error = Some(format!("{e} ({model})"));
                }
            }
        }

        if let Some(event) = fast_path(text) {
            return event;
        }
        match last_error {
            Some(e) => AgentEvent::reply(format!("All free models failed. Last error: {e}")),
            None => AgentEvent::reply(NO_CONTACT_MESSAGE),
        }
    }

    /// Ranked free models from the TTL cache, with the configured
    /// model prepended so it is always tried first. Catalog failures
    /// fall back to the configured model alone and are never cached.
    async fn candidate_models(&self, configured: &str) -> Vec<String> {
        let cached = self.cache.lock().fresh();
        let mut models = match cached {
            Some(models) => models,
            None => match self.provider.list_catalog().await {
                Ok(entries) => {
                    let ranked = rank_free_models(&entries);
                    if !ranked.is_empty() {
                        self.cache.lock().store(ranked.clone());
                    }
                    ranked
                }
                Err(e) => {
                    warn!(error = %e, "model catalog fetch failed");
                    Vec::new()
                }
            },
        };

        if !configured.is_empty() && !models.iter().any(|m| m == configured) {
            models.insert(0, configured.to_string());
        }
        models
    }
}
