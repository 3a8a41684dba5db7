use analysis_core::{
    AnalysisError, AnalysisRequest, AnalyzedReport, ImageInput, Plan, Region, StockSubMode,
};
use serde::{Deserialize, Serialize};

use crate::client::AnalysisClient;
use crate::store::{AnalysisSessionStore, ConcurrencyPolicy, SessionSnapshot};

/// Form inputs of the stock analysis screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAnalysisParams {
    pub images: Vec<ImageInput>,
    pub region: Region,
    pub sub_mode: StockSubMode,
    pub plan: Plan,
    #[serde(default)]
    pub strategy_rules: Option<String>,
    #[serde(default)]
    pub focus_indicators: Vec<String>,
}

impl From<StockAnalysisParams> for AnalysisRequest {
    fn from(params: StockAnalysisParams) -> Self {
        let mut request = AnalysisRequest::stock(params.sub_mode, params.plan, params.region)
            .with_images(params.images)
            .with_focus_indicators(params.focus_indicators);
        request.free_text = params.strategy_rules;
        request
    }
}

/// Form inputs of the global markets screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalAnalysisParams {
    pub market_data: String,
    pub plan: Plan,
}

impl From<GlobalAnalysisParams> for AnalysisRequest {
    fn from(params: GlobalAnalysisParams) -> Self {
        AnalysisRequest::global(params.market_data, params.plan)
    }
}

/// Entry point for the UI: runs analyses and keeps the latest one
pub struct AnalysisSession {
    client: AnalysisClient,
    store: AnalysisSessionStore,
}

impl AnalysisSession {
    pub fn new(client: AnalysisClient) -> Self {
        let policy = client.config().concurrency;
        Self::with_policy(client, policy)
    }

    pub fn with_policy(client: AnalysisClient, policy: ConcurrencyPolicy) -> Self {
        Self {
            client,
            store: AnalysisSessionStore::new(policy),
        }
    }

    pub async fn analyze_stock(
        &self,
        params: StockAnalysisParams,
    ) -> Result<AnalyzedReport, AnalysisError> {
        self.run(params.into()).await
    }

    pub async fn analyze_global(
        &self,
        params: GlobalAnalysisParams,
    ) -> Result<AnalyzedReport, AnalysisError> {
        self.run(params.into()).await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.store.get()
    }

    /// Called when the user leaves the result view
    pub fn clear_result(&self) {
        self.store.clear();
    }

    /// The caller always gets its own outcome, but the store only keeps it
    /// while no newer call or clear has happened.
    async fn run(&self, request: AnalysisRequest) -> Result<AnalyzedReport, AnalysisError> {
        // Invalid input never touches loading state
        request.validate()?;
        let generation = self.store.begin()?;

        match self.client.analyze(&request).await {
            Ok(report) => {
                self.store.set(generation, report.clone());
                Ok(report)
            }
            Err(err) => {
                self.store.fail(generation, &err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::test_support::{stock_reply, ScriptedProvider};
    use analysis_core::{ErrorKind, MetricsPayload, ProviderError};
    use std::sync::Arc;

    fn strategy_params(rules: &str) -> StockAnalysisParams {
        StockAnalysisParams {
            images: Vec::new(),
            region: Region::International,
            sub_mode: StockSubMode::StrategyOnly,
            plan: Plan::Pro,
            strategy_rules: Some(rules.to_string()),
            focus_indicators: vec!["RSI".to_string()],
        }
    }

    fn session(provider: &Arc<ScriptedProvider>, policy: ConcurrencyPolicy) -> Arc<AnalysisSession> {
        let client = AnalysisClient::new(provider.clone(), AnalysisConfig::default());
        Arc::new(AnalysisSession::with_policy(client, policy))
    }

    fn buy_sell_score(snapshot: &SessionSnapshot) -> Option<f64> {
        match &snapshot.current.as_ref()?.parsed.metrics {
            MetricsPayload::Stock(stock) => stock.buy_sell_score,
            _ => None,
        }
    }

    #[test]
    fn test_stock_params_keep_inline_images_through_json() {
        let mut params = strategy_params("Buy above VWAP");
        params.images = vec![ImageInput::Inline {
            label: "upload-1".to_string(),
            mime_type: "image/png".to_string(),
            data: vec![0x89, b'P', b'N', b'G'],
        }];

        let json = serde_json::to_string(&params).unwrap();
        let back: StockAnalysisParams = serde_json::from_str(&json).unwrap();

        match &back.images[0] {
            ImageInput::Inline { data, mime_type, .. } => {
                assert_eq!(data, &vec![0x89, b'P', b'N', b'G']);
                assert_eq!(mime_type, "image/png");
            }
            other => panic!("expected inline image, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_stock_request_never_calls_provider() {
        let provider = Arc::new(ScriptedProvider::default().reply(stock_reply(50)));
        let session = session(&provider, ConcurrencyPolicy::Supersede);

        let params = StockAnalysisParams {
            images: Vec::new(),
            region: Region::Domestic,
            sub_mode: StockSubMode::SingleChart,
            plan: Plan::Free,
            strategy_rules: Some("   ".to_string()),
            focus_indicators: Vec::new(),
        };
        let err = tokio_test::assert_err!(session.analyze_stock(params).await);

        assert!(matches!(err, AnalysisError::Validation { ref field, .. } if field == "images"));
        assert_eq!(provider.calls(), 0);
        let snapshot = session.snapshot();
        assert!(!snapshot.loading);
        assert!(snapshot.last_error.is_none());
    }

    #[tokio::test]
    async fn test_later_call_wins_when_earlier_resolves_last() {
        let provider = Arc::new(ScriptedProvider::default());
        let release_a = provider.gated_reply(stock_reply(10));
        provider.queue_reply(stock_reply(90));
        let session = session(&provider, ConcurrencyPolicy::Supersede);

        let a = tokio::spawn({
            let session = session.clone();
            async move { session.analyze_stock(strategy_params("A")).await }
        });
        provider.wait_for_calls(1).await;

        let b = tokio_test::assert_ok!(session.analyze_stock(strategy_params("B")).await);
        assert_eq!(b.parsed.display_text, "Report 90.");
        assert_eq!(buy_sell_score(&session.snapshot()), Some(90.0));

        release_a.send(()).unwrap();
        let a = a.await.unwrap().unwrap();
        assert_eq!(a.parsed.display_text, "Report 10.");

        let snapshot = session.snapshot();
        assert_eq!(buy_sell_score(&snapshot), Some(90.0));
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_clear_discards_in_flight_result() {
        let provider = Arc::new(ScriptedProvider::default());
        let release = provider.gated_reply(stock_reply(60));
        let session = session(&provider, ConcurrencyPolicy::Supersede);

        let call = tokio::spawn({
            let session = session.clone();
            async move { session.analyze_stock(strategy_params("A")).await }
        });
        provider.wait_for_calls(1).await;
        assert!(session.snapshot().loading);

        session.clear_result();
        release.send(()).unwrap();
        assert!(call.await.unwrap().is_ok());

        let snapshot = session.snapshot();
        assert!(snapshot.current.is_none());
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_reject_policy_returns_busy() {
        let provider = Arc::new(ScriptedProvider::default());
        let release = provider.gated_reply(stock_reply(70));
        let session = session(&provider, ConcurrencyPolicy::RejectWhileLoading);

        let call = tokio::spawn({
            let session = session.clone();
            async move { session.analyze_stock(strategy_params("A")).await }
        });
        provider.wait_for_calls(1).await;

        let err = session
            .analyze_global(GlobalAnalysisParams {
                market_data: "DAX -0.4%".to_string(),
                plan: Plan::Pro,
            })
            .await
            .unwrap_err();
        assert_eq!(err, AnalysisError::Busy);
        assert_eq!(provider.calls(), 1);

        release.send(()).unwrap();
        call.await.unwrap().unwrap();
        assert_eq!(buy_sell_score(&session.snapshot()), Some(70.0));
    }

    #[tokio::test]
    async fn test_failure_is_recorded() {
        let provider = Arc::new(ScriptedProvider::default().fail(ProviderError::Status {
            status: 429,
            body: "quota".to_string(),
        }));
        let session = session(&provider, ConcurrencyPolicy::Supersede);

        let err = session
            .analyze_global(GlobalAnalysisParams {
                market_data: "NIFTY 50 +0.85%".to_string(),
                plan: Plan::Free,
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::QuotaExceeded);
        let last_error = session.snapshot().last_error.unwrap();
        assert_eq!(last_error.kind, ErrorKind::QuotaExceeded);
        assert_eq!(last_error.message, "Daily API limit reached. Please try again later.");
    }
}
