use analysis_core::{MetricsPayload, ParsedAnalysis, Plan};
use serde_json::Value;

/// Global indices a Free plan may see
pub const FREE_GLOBAL_INDEX_LIMIT: usize = 4;

const FREE_STOCK_KEYS: &[&str] = &["buySellScore", "riskScore", "trendStrength"];

/// Remove metrics the plan does not include. Display text is left alone.
pub fn apply_plan_gate(plan: Plan, parsed: &mut ParsedAnalysis) {
    if plan != Plan::Free {
        return;
    }

    if matches!(parsed.metrics, MetricsPayload::Stock(_)) {
        parsed.metrics = MetricsPayload::Empty;
        for key in FREE_STOCK_KEYS {
            parsed.raw_metrics.remove(*key);
        }
        tracing::info!("Free plan: removed stock scores and trend strength");
        return;
    }

    if let MetricsPayload::Global(global) = &mut parsed.metrics {
        if global.global_indices.len() > FREE_GLOBAL_INDEX_LIMIT {
            tracing::info!(
                "Free plan: truncated global indices from {} to {}",
                global.global_indices.len(),
                FREE_GLOBAL_INDEX_LIMIT
            );
            global.global_indices.truncate(FREE_GLOBAL_INDEX_LIMIT);
        }
        if let Some(Value::Array(indices)) = parsed.raw_metrics.get_mut("globalIndices") {
            indices.truncate(FREE_GLOBAL_INDEX_LIMIT);
        }
    }
}
