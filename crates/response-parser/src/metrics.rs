use analysis_core::{
    GlobalIndex, GlobalMetrics, MetricsPayload, RegionalStrength, Sentiment, StockMetrics,
    TrendStrength, GLOBAL_SIGNATURE_KEYS, STOCK_SIGNATURE_KEYS,
};
use serde_json::{Map, Value};

/// Decide the payload shape from signature keys and decode it field by field.
///
/// Malformed fields are dropped rather than failing the whole payload, and
/// missing scores stay `None`.
pub fn decode_metrics(object: &Map<String, Value>) -> MetricsPayload {
    let has_any = |keys: &[&str]| keys.iter().any(|k| object.contains_key(*k));

    if has_any(GLOBAL_SIGNATURE_KEYS) {
        MetricsPayload::Global(GlobalMetrics {
            global_risk_score: object.get("globalRiskScore").and_then(number),
            regional_strength: object.get("regionalStrength").and_then(regional_strength),
            global_indices: list(object.get("globalIndices"), global_index),
        })
    } else if has_any(STOCK_SIGNATURE_KEYS) {
        MetricsPayload::Stock(StockMetrics {
            buy_sell_score: object.get("buySellScore").and_then(number),
            risk_score: object.get("riskScore").and_then(number),
            trend_strength: list(object.get("trendStrength"), trend_strength),
        })
    } else {
        MetricsPayload::Empty
    }
}

/// Numbers, or strings such as "82", "+0.85" and "-1.2%"
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim_start_matches('+')
            .trim()
            .parse::<f64>()
            .ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_of<'a>(entry: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| entry.get(*k))
}

fn sentiment(entry: &Map<String, Value>) -> Sentiment {
    entry
        .get("sentiment")
        .and_then(Value::as_str)
        .map(Sentiment::from_label)
        .unwrap_or(Sentiment::Neutral)
}

fn list<T>(value: Option<&Value>, decode: fn(&Map<String, Value>) -> Option<T>) -> Vec<T> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .filter_map(decode)
                .collect()
        })
        .unwrap_or_default()
}

fn trend_strength(entry: &Map<String, Value>) -> Option<TrendStrength> {
    Some(TrendStrength {
        timeframe: first_of(entry, &["tf", "timeframe", "timeframeLabel"]).and_then(text)?,
        value: entry.get("value").and_then(number)?,
        sentiment: sentiment(entry),
    })
}

fn global_index(entry: &Map<String, Value>) -> Option<GlobalIndex> {
    Some(GlobalIndex {
        name: entry.get("name").and_then(text)?,
        change_percent: first_of(entry, &["change", "changePercent"]).and_then(number)?,
        sentiment: sentiment(entry),
    })
}

fn regional_strength(value: &Value) -> Option<RegionalStrength> {
    let object = value.as_object()?;
    let score = |name: &str| {
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| number(v))
    };
    let regions = RegionalStrength {
        us: score("US"),
        india: score("India"),
        europe: score("Europe"),
        asia: score("Asia"),
    };
    regions.entries().iter().any(|(_, v)| v.is_some()).then_some(regions)
}
