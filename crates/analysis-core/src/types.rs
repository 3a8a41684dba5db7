use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::metrics::MetricsPayload;

/// Indicators the user can ask the model to focus on.
pub const INDICATOR_CATALOG: &[&str] = &[
    "MACD",
    "RSI",
    "Bollinger Bands",
    "EMA (20/50/200)",
    "Stochastic",
    "Volume Profile",
    "Ichimoku Cloud",
    "Fibonacci Retracement",
];

/// Indicators selectable on the Free plan
pub const FREE_INDICATORS: &[&str] = &["RSI", "MACD", "EMA (20/50/200)"];

/// Most chart images one stock request may carry
pub const MAX_IMAGES: usize = 4;

pub const MAX_STRATEGY_RULES_CHARS: usize = 1000;
pub const MAX_MARKET_DATA_CHARS: usize = 5000;

/// Top-level analysis domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Stock,
    Global,
}

/// Stock-mode variant selected on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockSubMode {
    SingleChart,
    MultiChart,
    StrategyOnly,
}

impl StockSubMode {
    pub fn to_label(&self) -> &'static str {
        match self {
            StockSubMode::SingleChart => "Single Chart",
            StockSubMode::MultiChart => "Multi Chart",
            StockSubMode::StrategyOnly => "Strategy Only",
        }
    }
}

/// Subscription tier. Carried through to the model, never computed locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plan {
    Free,
    Pro,
    Advanced,
}

impl Plan {
    pub fn to_label(&self) -> &'static str {
        match self {
            Plan::Free => "Free",
            Plan::Pro => "Pro",
            Plan::Advanced => "Advanced",
        }
    }

    pub fn max_indicators(&self) -> usize {
        match self {
            Plan::Free => 3,
            Plan::Pro | Plan::Advanced => 5,
        }
    }
}

/// Currency/market framing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    Domestic,
    International,
}

impl Region {
    pub fn to_label(&self) -> &'static str {
        match self {
            Region::Domestic => "India (INR)",
            Region::International => "International (USD)",
        }
    }
}

/// A chart image supplied by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ImageInput {
    File(PathBuf),
    Inline {
        label: String,
        mime_type: String,
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
    },
}

impl ImageInput {
    /// Name used when reporting a failure for this asset
    pub fn label(&self) -> String {
        match self {
            ImageInput::File(path) => path.display().to_string(),
            ImageInput::Inline { label, .. } => label.clone(),
        }
    }
}

/// Inline image bytes travel as standard base64 inside JSON
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(encoded).map_err(serde::de::Error::custom)
    }
}

/// Image ready for transmission (base64 payload)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    pub mime_type: String,
    pub data: String,
}

/// Inputs for one analysis call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub mode: Mode,
    pub sub_mode: Option<StockSubMode>,
    pub plan: Plan,
    pub region: Region,
    pub images: Vec<ImageInput>,
    pub free_text: Option<String>,
    #[serde(default)]
    pub focus_indicators: Vec<String>,
}

impl AnalysisRequest {
    pub fn stock(sub_mode: StockSubMode, plan: Plan, region: Region) -> Self {
        Self {
            mode: Mode::Stock,
            sub_mode: Some(sub_mode),
            plan,
            region,
            images: Vec::new(),
            free_text: None,
            focus_indicators: Vec::new(),
        }
    }

    pub fn global(free_text: impl Into<String>, plan: Plan) -> Self {
        Self {
            mode: Mode::Global,
            sub_mode: None,
            plan,
            region: Region::International,
            images: Vec::new(),
            free_text: Some(free_text.into()),
            focus_indicators: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<ImageInput>) -> Self {
        self.images = images;
        self
    }

    pub fn with_free_text(mut self, text: impl Into<String>) -> Self {
        self.free_text = Some(text.into());
        self
    }

    pub fn with_focus_indicators(mut self, indicators: Vec<String>) -> Self {
        self.focus_indicators = indicators;
        self
    }

    /// Free text with surrounding whitespace removed, `None` when blank
    pub fn text(&self) -> Option<&str> {
        self.free_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    fn text_chars(&self) -> usize {
        self.text().map_or(0, |t| t.chars().count())
    }

    /// Check the minimum-input invariants and size limits for the selected mode and plan
    pub fn validate(&self) -> Result<(), AnalysisError> {
        match self.mode {
            Mode::Stock => {
                let sub_mode = self.sub_mode.unwrap_or(StockSubMode::SingleChart);
                match sub_mode {
                    StockSubMode::StrategyOnly if self.text().is_none() => {
                        return Err(AnalysisError::validation(
                            "strategy_rules",
                            "strategy-only analysis needs strategy rules",
                        ));
                    }
                    StockSubMode::MultiChart if self.images.len() < 2 => {
                        return Err(AnalysisError::validation(
                            "images",
                            "multi-chart analysis needs at least two chart images",
                        ));
                    }
                    _ => {}
                }
                if self.images.is_empty() && self.text().is_none() {
                    return Err(AnalysisError::validation(
                        "images",
                        "add at least one chart image or strategy rules",
                    ));
                }
                if self.images.len() > MAX_IMAGES {
                    return Err(AnalysisError::validation(
                        "images",
                        format!("at most {} chart images are allowed", MAX_IMAGES),
                    ));
                }
                if self.text_chars() > MAX_STRATEGY_RULES_CHARS {
                    return Err(AnalysisError::validation(
                        "strategy_rules",
                        format!(
                            "strategy rules are limited to {} characters",
                            MAX_STRATEGY_RULES_CHARS
                        ),
                    ));
                }
            }
            Mode::Global => {
                if self.sub_mode.is_some() {
                    return Err(AnalysisError::validation(
                        "sub_mode",
                        "global analysis has no stock sub-mode",
                    ));
                }
                if !self.images.is_empty() {
                    return Err(AnalysisError::validation(
                        "images",
                        "global analysis takes market text, not images",
                    ));
                }
                if self.text().is_none() {
                    return Err(AnalysisError::validation(
                        "market_data",
                        "add at least one market index or headline to analyze",
                    ));
                }
                if self.text_chars() > MAX_MARKET_DATA_CHARS {
                    return Err(AnalysisError::validation(
                        "market_data",
                        format!("market data is limited to {} characters", MAX_MARKET_DATA_CHARS),
                    ));
                }
            }
        }

        if let Some(unknown) = self
            .focus_indicators
            .iter()
            .find(|name| !INDICATOR_CATALOG.contains(&name.as_str()))
        {
            return Err(AnalysisError::validation(
                "focus_indicators",
                format!("unknown indicator: {}", unknown),
            ));
        }

        let max_indicators = self.plan.max_indicators();
        if self.focus_indicators.len() > max_indicators {
            return Err(AnalysisError::validation(
                "focus_indicators",
                format!(
                    "the {} plan allows at most {} focus indicators",
                    self.plan.to_label(),
                    max_indicators
                ),
            ));
        }

        if self.plan == Plan::Free {
            if let Some(locked) = self
                .focus_indicators
                .iter()
                .find(|name| !FREE_INDICATORS.contains(&name.as_str()))
            {
                return Err(AnalysisError::validation(
                    "focus_indicators",
                    format!("{} needs a Pro or Advanced plan", locked),
                ));
            }
        }

        Ok(())
    }
}

/// Request metadata stored alongside a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEcho {
    pub request_id: Uuid,
    pub mode: Mode,
    pub sub_mode: Option<StockSubMode>,
    pub plan: Plan,
    pub region: Region,
    pub focus_indicators: Vec<String>,
    pub image_count: usize,
    pub created_at: DateTime<Utc>,
}

impl RequestEcho {
    pub fn from_request(request: &AnalysisRequest) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            mode: request.mode,
            sub_mode: request.sub_mode,
            plan: request.plan,
            region: request.region,
            focus_indicators: request.focus_indicators.clone(),
            image_count: request.images.len(),
            created_at: Utc::now(),
        }
    }
}

/// Which step of the extraction chain recovered the metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Fenced,
    Trailing,
    Signature,
    None,
}

/// Display text plus typed metrics split out of one model response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedAnalysis {
    pub display_text: String,
    pub metrics: MetricsPayload,
    #[serde(default)]
    pub raw_metrics: serde_json::Map<String, serde_json::Value>,
    pub extraction: ExtractionMethod,
}

/// Parsed analysis together with the request it answers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedReport {
    pub parsed: ParsedAnalysis,
    pub echo: RequestEcho,
}

/// Outbound request handed to a model provider
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub images: Vec<EncodedImage>,
    pub temperature: f32,
}
