use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Missing or invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Could not process {asset}: {reason}")]
    InputProcessing { asset: String, reason: String },

    #[error("An analysis is already running")]
    Busy,

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Stable error kinds surfaced to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    Authentication,
    QuotaExceeded,
    Network,
    InputProcessing,
    Busy,
    Unknown,
}

impl AnalysisError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AnalysisError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn input_processing(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::InputProcessing {
            asset: asset.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Validation { .. } => ErrorKind::Validation,
            AnalysisError::Authentication(_) => ErrorKind::Authentication,
            AnalysisError::QuotaExceeded(_) => ErrorKind::QuotaExceeded,
            AnalysisError::Network(_) => ErrorKind::Network,
            AnalysisError::InputProcessing { .. } => ErrorKind::InputProcessing,
            AnalysisError::Busy => ErrorKind::Busy,
            AnalysisError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Message shown to the user; provider detail stays in the logs
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Validation { message, .. } => capitalize(message),
            AnalysisError::Authentication(_) => {
                "Invalid API key. Please check your Gemini API key in settings.".to_string()
            }
            AnalysisError::QuotaExceeded(_) => {
                "Daily API limit reached. Please try again later.".to_string()
            }
            AnalysisError::Network(_) => {
                "Network error. Please check your internet connection and try again.".to_string()
            }
            AnalysisError::InputProcessing { asset, .. } => {
                format!("Could not process {}. Please try another image.", asset)
            }
            AnalysisError::Busy => "An analysis is already in progress.".to_string(),
            AnalysisError::Unknown(_) => {
                "Analysis failed. Please try again or contact support if the issue persists."
                    .to_string()
            }
        }
    }

    /// Whether the user can simply try the same action again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AnalysisError::Network(_) | AnalysisError::Busy | AnalysisError::Unknown(_)
        )
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Low-level failure reported by a model provider, before classification
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {message}")]
    Transport { message: String, timeout: bool },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Other(String),
}
