use std::sync::Arc;

use analysis_core::{AnalysisError, AnalysisRequest, ImageEncoder, ModelRequest};

use crate::prompts;

/// Builds the outbound model request from form inputs
#[derive(Clone)]
pub struct RequestComposer {
    encoder: Arc<dyn ImageEncoder>,
    temperature: f32,
}

impl RequestComposer {
    pub fn new(encoder: Arc<dyn ImageEncoder>, temperature: f32) -> Self {
        Self {
            encoder,
            temperature,
        }
    }

    /// Validate, pick the system instruction, write the prompt and encode
    /// images in their original order. Nothing is encoded for an invalid
    /// request.
    pub async fn compose(&self, request: &AnalysisRequest) -> Result<ModelRequest, AnalysisError> {
        request.validate()?;

        let mut images = Vec::with_capacity(request.images.len());
        for image in &request.images {
            images.push(self.encoder.encode(image).await?);
        }

        Ok(ModelRequest {
            system_instruction: prompts::system_instruction(request.plan),
            prompt: prompts::build_prompt(request),
            images,
            temperature: self.temperature,
        })
    }
}
