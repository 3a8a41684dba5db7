use std::sync::Arc;

use analysis_core::{
    AnalysisError, AnalysisRequest, AnalyzedReport, ImageEncoder, ModelProvider, RequestEcho,
};

use crate::classify::classify;
use crate::composer::RequestComposer;
use crate::config::AnalysisConfig;
use crate::encoding::FileImageEncoder;
use crate::plan_gate::apply_plan_gate;

/// Runs one analysis end to end: validate, compose, call the model,
/// extract and gate. Single attempt, no retries.
#[derive(Clone)]
pub struct AnalysisClient {
    provider: Arc<dyn ModelProvider>,
    composer: RequestComposer,
    config: AnalysisConfig,
}

impl AnalysisClient {
    pub fn new(provider: Arc<dyn ModelProvider>, config: AnalysisConfig) -> Self {
        Self::with_encoder(provider, Arc::new(FileImageEncoder), config)
    }

    pub fn with_encoder(
        provider: Arc<dyn ModelProvider>,
        encoder: Arc<dyn ImageEncoder>,
        config: AnalysisConfig,
    ) -> Self {
        let composer = RequestComposer::new(encoder, config.temperature);
        Self {
            provider,
            composer,
            config,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    #[tracing::instrument(
        skip(self, request),
        fields(request_id = tracing::field::Empty, mode = ?request.mode, plan = ?request.plan)
    )]
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalyzedReport, AnalysisError> {
        let echo = RequestEcho::from_request(request);
        tracing::Span::current().record("request_id", tracing::field::display(echo.request_id));

        let model_request = self.composer.compose(request).await.map_err(|e| {
            tracing::info!("Request rejected before model call: {}", e);
            e
        })?;

        tracing::info!(
            "Calling {} with {} image(s)",
            self.provider.provider_name(),
            model_request.images.len()
        );

        let timeout = self.config.request_timeout;
        let raw = match tokio::time::timeout(timeout, self.provider.generate(&model_request)).await {
            Ok(Ok(text)) => text,
            Ok(Err(err)) => {
                let classified = classify(&err);
                tracing::warn!("Model call failed ({:?}): {}", classified.kind(), err);
                return Err(classified);
            }
            Err(_) => {
                tracing::warn!("Model call timed out after {:?}", timeout);
                return Err(AnalysisError::Network(format!(
                    "model call timed out after {}s",
                    timeout.as_secs_f64()
                )));
            }
        };

        let mut parsed = response_parser::extract(&raw);
        if self.config.enforce_plan_limits {
            apply_plan_gate(request.plan, &mut parsed);
        }

        tracing::info!(
            extraction = ?parsed.extraction,
            chars = parsed.display_text.len(),
            "Analysis complete"
        );
        Ok(AnalyzedReport { parsed, echo })
    }
}
