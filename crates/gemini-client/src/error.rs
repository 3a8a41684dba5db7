use analysis_core::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Gemini returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Prompt blocked: {0}")]
    Blocked(String),

    #[error("Response contained no candidates")]
    EmptyResponse,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing environment variable {0}")]
    MissingConfig(&'static str),

    #[error("Invalid value for {var}: {value}")]
    InvalidConfig { var: &'static str, value: String },
}

pub type GeminiResult<T> = Result<T, GeminiError>;

impl From<GeminiError> for ProviderError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::RequestFailed(e) => {
                if let Some(status) = e.status() {
                    ProviderError::Status {
                        status: status.as_u16(),
                        body: e.to_string(),
                    }
                } else if e.is_decode() {
                    ProviderError::InvalidResponse(e.to_string())
                } else {
                    ProviderError::Transport {
                        timeout: e.is_timeout(),
                        message: e.to_string(),
                    }
                }
            }
            GeminiError::Status { status, body } => ProviderError::Status { status, body },
            GeminiError::Serialization(e) => ProviderError::InvalidResponse(e.to_string()),
            GeminiError::EmptyResponse => {
                ProviderError::InvalidResponse("response contained no candidates".to_string())
            }
            other => ProviderError::Other(other.to_string()),
        }
    }
}
