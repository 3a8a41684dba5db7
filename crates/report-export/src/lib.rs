mod templates;

pub use templates::{render_html, render_text, DISCLAIMER};

use analysis_core::{clamp_score, Sentiment};
use serde::{Deserialize, Serialize};

/// Gauge band of a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
}

impl ScoreBand {
    /// `>= 70` is Strong, `>= 40` Moderate, anything lower Weak. Scores are
    /// clamped to 0-100 first.
    pub fn from_score(score: f64) -> Self {
        let score = clamp_score(score);
        if score >= 70.0 {
            ScoreBand::Strong
        } else if score >= 40.0 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Weak
        }
    }
}

/// Which gauge a score belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreKind {
    BuySell,
    Risk,
    GlobalRisk,
}

/// Colour meaning of a band on a given gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Positive,
    Neutral,
    Caution,
    Negative,
}

impl Tone {
    /// Dark-theme colour used by the app's gauges
    pub fn color_hex(&self) -> &'static str {
        match self {
            Tone::Positive => "#10B981",
            Tone::Neutral => "#8B5CF6",
            Tone::Caution => "#F59E0B",
            Tone::Negative => "#EF4444",
        }
    }
}

/// High risk reads as bad, so risk gauges invert the buy/sell colours
pub fn score_tone(kind: ScoreKind, score: f64) -> Tone {
    match (kind, ScoreBand::from_score(score)) {
        (ScoreKind::BuySell, ScoreBand::Strong) => Tone::Positive,
        (ScoreKind::BuySell, ScoreBand::Moderate) => Tone::Caution,
        (ScoreKind::BuySell, ScoreBand::Weak) => Tone::Negative,
        (ScoreKind::Risk, ScoreBand::Strong) => Tone::Negative,
        (ScoreKind::Risk, ScoreBand::Moderate) => Tone::Caution,
        (ScoreKind::Risk, ScoreBand::Weak) => Tone::Positive,
        (ScoreKind::GlobalRisk, ScoreBand::Strong) => Tone::Caution,
        (ScoreKind::GlobalRisk, ScoreBand::Moderate) => Tone::Neutral,
        (ScoreKind::GlobalRisk, ScoreBand::Weak) => Tone::Positive,
    }
}

pub fn sentiment_tone(sentiment: Sentiment) -> Tone {
    match sentiment {
        Sentiment::Bullish => Tone::Positive,
        Sentiment::Bearish => Tone::Negative,
        Sentiment::Neutral => Tone::Caution,
    }
}
