//! Test doubles shared by the orchestrator tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use analysis_core::{
    AnalysisError, EncodedImage, ImageEncoder, ImageInput, ModelProvider, ModelRequest,
    ProviderError,
};
use async_trait::async_trait;
use tokio::sync::oneshot;

pub const STOCK_REPLY: &str = r#"## Trend
Price holds above the 50 EMA.

{"buySellScore": 72, "riskScore": 35, "trendStrength": [{"tf": "1D", "value": 80, "sentiment": "Bullish"}]}"#;

pub fn stock_reply(score: u32) -> String {
    format!("Report {}.\n{{\"buySellScore\": {}, \"riskScore\": 40}}", score, score)
}

enum Step {
    Reply(Result<String, ProviderError>),
    Gated(oneshot::Receiver<()>, Result<String, ProviderError>),
    Hang,
}

/// Provider that answers calls in order from a script
#[derive(Default)]
pub struct ScriptedProvider {
    calls: AtomicUsize,
    script: Mutex<VecDeque<Step>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Step::Reply(Ok(text.into())))
    }

    pub fn fail(self, err: ProviderError) -> Self {
        self.push(Step::Reply(Err(err)))
    }

    /// Reply only once the returned sender fires
    pub fn gated_reply(&self, text: impl Into<String>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push_step(Step::Gated(rx, Ok(text.into())));
        tx
    }

    pub fn hang(self) -> Self {
        self.push(Step::Hang)
    }

    /// Queue a reply on a provider that is already shared
    pub fn queue_reply(&self, text: impl Into<String>) {
        self.push_step(Step::Reply(Ok(text.into())));
    }

    fn push(self, step: Step) -> Self {
        self.push_step(step);
        self
    }

    fn push_step(&self, step: Step) {
        self.script.lock().unwrap().push_back(step);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Yield until `n` calls have started
    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn generate(&self, request: &ModelRequest) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let step = self.script.lock().unwrap().pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);

        match step {
            Some(Step::Reply(result)) => result,
            Some(Step::Gated(rx, result)) => {
                rx.await.ok();
                result
            }
            Some(Step::Hang) => std::future::pending().await,
            None => Err(ProviderError::Other("script exhausted".to_string())),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Encoder that counts calls and returns a fixed payload
#[derive(Default)]
pub struct CountingEncoder {
    calls: AtomicUsize,
}

impl CountingEncoder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageEncoder for CountingEncoder {
    async fn encode(&self, _image: &ImageInput) -> Result<EncodedImage, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(EncodedImage {
            mime_type: "image/png".to_string(),
            data: "AA==".to_string(),
        })
    }
}
