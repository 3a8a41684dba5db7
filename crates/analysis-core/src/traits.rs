use async_trait::async_trait;
use crate::{AnalysisError, EncodedImage, ImageInput, ModelRequest, ProviderError};

/// Backend that turns a composed request into raw model text
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn generate(&self, request: &ModelRequest) -> Result<String, ProviderError>;

    fn provider_name(&self) -> &'static str;
}

/// Turns a user-supplied image into a transmittable payload
#[async_trait]
pub trait ImageEncoder: Send + Sync {
    async fn encode(&self, image: &ImageInput) -> Result<EncodedImage, AnalysisError>;
}
