use analysis_orchestrator::AnalysisConfig;
use anyhow::{Context, Result};
use gemini_client::GeminiConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            gemini: GeminiConfig::from_env().context("Failed to load Gemini settings")?,
            analysis: analysis_from_env()?,
        };
        Ok(config)
    }
}

/// Analysis settings alone; enough for offline parsing
pub fn analysis_from_env() -> Result<AnalysisConfig> {
    AnalysisConfig::from_env().context("Failed to load analysis settings")
}
