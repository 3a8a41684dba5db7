use serde::{Deserialize, Serialize};

/// Top-level keys that identify a stock metrics object
pub const STOCK_SIGNATURE_KEYS: &[&str] = &["buySellScore", "riskScore", "trendStrength"];

/// Top-level keys that identify a global metrics object
pub const GLOBAL_SIGNATURE_KEYS: &[&str] = &["globalRiskScore", "regionalStrength", "globalIndices"];

/// Market direction attached to a timeframe or index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    /// Lenient parse: anything mentioning bull/bear wins, everything else is neutral
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("bull") {
            Sentiment::Bullish
        } else if lower.contains("bear") {
            Sentiment::Bearish
        } else {
            Sentiment::Neutral
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Sentiment::Bullish => "Bullish",
            Sentiment::Bearish => "Bearish",
            Sentiment::Neutral => "Neutral",
        }
    }
}

/// Strength of the trend on one timeframe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendStrength {
    pub timeframe: String,
    pub value: f64,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMetrics {
    pub buy_sell_score: Option<f64>,
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub trend_strength: Vec<TrendStrength>,
}

impl StockMetrics {
    pub fn is_empty(&self) -> bool {
        self.buy_sell_score.is_none() && self.risk_score.is_none() && self.trend_strength.is_empty()
    }
}

/// Regional strength scores; regions the model omitted stay `None`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionalStrength {
    #[serde(rename = "US")]
    pub us: Option<f64>,
    #[serde(rename = "India")]
    pub india: Option<f64>,
    #[serde(rename = "Europe")]
    pub europe: Option<f64>,
    #[serde(rename = "Asia")]
    pub asia: Option<f64>,
}

impl RegionalStrength {
    /// (label, score) pairs in display order
    pub fn entries(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("US", self.us),
            ("India", self.india),
            ("Europe", self.europe),
            ("Asia", self.asia),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalIndex {
    pub name: String,
    pub change_percent: f64,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalMetrics {
    pub global_risk_score: Option<f64>,
    pub regional_strength: Option<RegionalStrength>,
    #[serde(default)]
    pub global_indices: Vec<GlobalIndex>,
}

impl GlobalMetrics {
    pub fn is_empty(&self) -> bool {
        self.global_risk_score.is_none()
            && self.regional_strength.is_none()
            && self.global_indices.is_empty()
    }
}

/// Visualization payload, shape decided by which signature keys were present
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum MetricsPayload {
    Stock(StockMetrics),
    Global(GlobalMetrics),
    #[default]
    Empty,
}

impl MetricsPayload {
    pub fn is_empty(&self) -> bool {
        match self {
            MetricsPayload::Stock(m) => m.is_empty(),
            MetricsPayload::Global(m) => m.is_empty(),
            MetricsPayload::Empty => true,
        }
    }
}

/// Clamp a score into the 0-100 gauge range for display
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_from_label() {
        assert_eq!(Sentiment::from_label("Bullish"), Sentiment::Bullish);
        assert_eq!(Sentiment::from_label("strongly bearish"), Sentiment::Bearish);
        assert_eq!(Sentiment::from_label("NEUTRAL"), Sentiment::Neutral);
        assert_eq!(Sentiment::from_label("sideways"), Sentiment::Neutral);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(120.0), 100.0);
        assert_eq!(clamp_score(-4.0), 0.0);
        assert_eq!(clamp_score(57.0), 57.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_payload_serializes_with_shape_tag() {
        let payload = MetricsPayload::Stock(StockMetrics {
            buy_sell_score: Some(75.0),
            risk_score: None,
            trend_strength: vec![],
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["shape"], "stock");
        assert_eq!(json["buySellScore"], 75.0);
        assert!(json["riskScore"].is_null());
    }
}
