//! LLM gateway port

use async_trait::async_trait;
use brief_domain::constants::{DEFAULT_LLM_FALLBACK_MODEL, DEFAULT_LLM_MODEL};
use brief_domain::{ChatMessage, CompletionRequest, CompletionResponse, Result};

/// Text completion behind a model-routing gateway
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

/// Model selection shared by every caller of the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub model: String,
    pub fallbacks: Vec<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_LLM_MODEL.to_string(),
            fallbacks: vec![DEFAULT_LLM_FALLBACK_MODEL.to_string()],
        }
    }
}

impl LlmSettings {
    /// Single-turn request with these model settings.
    pub fn request(&self, prompt: impl Into<String>) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            fallbacks: self.fallbacks.clone(),
        }
    }
}
