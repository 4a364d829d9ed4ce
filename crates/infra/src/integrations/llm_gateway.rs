//! LLM gateway adapter
//!
//! The gateway fronts several model providers behind one `/v1/complete`
//! endpoint and tries `fallbacks` in order when the primary model fails.

use async_trait::async_trait;
use brief_core::CompletionGateway;
use brief_domain::{CompletionRequest, CompletionResponse, Result};
use reqwest::Method;
use tracing::{debug, instrument};

use crate::http::HttpClient;

/// LLM gateway completion client.
pub struct LlmGatewayClient {
    http: HttpClient,
    endpoint: String,
}

impl LlmGatewayClient {
    /// Client for the gateway at `base_url`.
    pub fn new(base_url: &str, http: HttpClient) -> Self {
        let endpoint = format!("{}/v1/complete", base_url.trim_end_matches('/'));
        Self { http, endpoint }
    }
}

#[async_trait]
impl CompletionGateway for LlmGatewayClient {
    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let builder = self.http.request(Method::POST, &self.endpoint).json(&request);
        let response: CompletionResponse = self.http.send_json(builder).await?;
        debug!(chars = response.content.len(), "completion received");
        Ok(response)
    }
}
