//! Maps provider failures onto the user-facing error taxonomy.

use analysis_core::{AnalysisError, ProviderError};

const AUTH_MARKERS: &[&str] = &["api key", "api_key", "unauthenticated", "permission denied"];
const QUOTA_MARKERS: &[&str] = &["quota", "rate limit", "resource_exhausted", "limit"];
const NETWORK_MARKERS: &[&str] = &["network", "fetch", "connection", "timed out", "timeout"];

/// Asset name used when the provider rejects an image without saying which
pub const PROVIDER_IMAGE_ASSET: &str = "the submitted image";

pub fn classify(err: &ProviderError) -> AnalysisError {
    match err {
        ProviderError::Status { status, body } => match status {
            401 | 403 => AnalysisError::Authentication(body.clone()),
            429 => AnalysisError::QuotaExceeded(body.clone()),
            400 if body.to_lowercase().contains("image") => {
                AnalysisError::input_processing(PROVIDER_IMAGE_ASSET, body.clone())
            }
            _ => by_message(&err.to_string()),
        },
        ProviderError::Transport { message, .. } => AnalysisError::Network(message.clone()),
        ProviderError::InvalidResponse(_) | ProviderError::Other(_) => by_message(&err.to_string()),
    }
}

fn by_message(detail: &str) -> AnalysisError {
    let lower = detail.to_lowercase();
    let mentions = |markers: &[&str]| markers.iter().any(|m| lower.contains(m));

    if mentions(AUTH_MARKERS) {
        AnalysisError::Authentication(detail.to_string())
    } else if mentions(QUOTA_MARKERS) {
        AnalysisError::QuotaExceeded(detail.to_string())
    } else if mentions(NETWORK_MARKERS) {
        AnalysisError::Network(detail.to_string())
    } else {
        tracing::error!("Unclassified provider error: {}", detail);
        AnalysisError::Unknown(detail.to_string())
    }
}
