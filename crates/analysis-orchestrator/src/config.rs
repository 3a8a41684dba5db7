use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::store::ConcurrencyPolicy;

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_TEMPERATURE: f32 = 0.6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Tunables for one analysis pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Upper bound on a single model call
    pub request_timeout: Duration,
    pub temperature: f32,
    /// Strip metrics the user's plan does not include
    pub enforce_plan_limits: bool,
    pub concurrency: ConcurrencyPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: DEFAULT_TEMPERATURE,
            enforce_plan_limits: true,
            concurrency: ConcurrencyPolicy::default(),
        }
    }
}

impl AnalysisConfig {
    /// Read `ANALYSIS_TIMEOUT_SECS`, `ANALYSIS_TEMPERATURE`,
    /// `ENFORCE_PLAN_LIMITS` and `ANALYSIS_CONCURRENCY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs: u64 = parse_or(&lookup, "ANALYSIS_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "ANALYSIS_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let temperature: f32 = parse_or(&lookup, "ANALYSIS_TEMPERATURE", DEFAULT_TEMPERATURE)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Invalid {
                var: "ANALYSIS_TEMPERATURE",
                value: temperature.to_string(),
            });
        }

        Ok(Self {
            request_timeout: Duration::from_secs(timeout_secs),
            temperature,
            enforce_plan_limits: parse_or(&lookup, "ENFORCE_PLAN_LIMITS", true)?,
            concurrency: parse_or(&lookup, "ANALYSIS_CONCURRENCY", ConcurrencyPolicy::default())?,
        })
    }
}

fn parse_or<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}
