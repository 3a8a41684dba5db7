use analysis_core::{ModelProvider, ModelRequest, ProviderError};
use async_trait::async_trait;

use crate::error::GeminiResult;
use crate::generate::GenerateContentRequest;
use crate::GeminiClient;

/// `ModelProvider` backed by the Gemini REST API
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    pub fn from_env() -> GeminiResult<Self> {
        Ok(Self::new(GeminiClient::from_env()?))
    }
}

impl From<GeminiClient> for GeminiProvider {
    fn from(client: GeminiClient) -> Self {
        Self::new(client)
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    async fn generate(&self, request: &ModelRequest) -> Result<String, ProviderError> {
        tracing::debug!(
            model = self.client.model(),
            images = request.images.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .generate_content(&GenerateContentRequest::from(request))
            .await?;
        let text = response.text()?;

        tracing::debug!(chars = text.len(), "Gemini response received");
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
