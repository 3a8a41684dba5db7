use std::path::Path;

use analysis_core::{AnalysisError, EncodedImage, ImageEncoder, ImageInput};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Reads chart images from disk (or takes inline bytes) and base64-encodes them
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageEncoder;

#[async_trait]
impl ImageEncoder for FileImageEncoder {
    async fn encode(&self, image: &ImageInput) -> Result<EncodedImage, AnalysisError> {
        let (bytes, mime_type) = match image {
            ImageInput::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    tracing::warn!("Failed to read image {}: {}", path.display(), e);
                    AnalysisError::input_processing(image.label(), e.to_string())
                })?;
                (bytes, mime_for_path(path).to_string())
            }
            ImageInput::Inline {
                mime_type, data, ..
            } => {
                let mime_type = if mime_type.trim().is_empty() {
                    DEFAULT_MIME_TYPE.to_string()
                } else {
                    mime_type.trim().to_string()
                };
                (data.clone(), mime_type)
            }
        };

        if bytes.is_empty() {
            return Err(AnalysisError::input_processing(
                image.label(),
                "image is empty",
            ));
        }

        Ok(EncodedImage {
            mime_type,
            data: BASE64.encode(bytes),
        })
    }
}

/// Mime type from the file extension, `image/jpeg` when unknown
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("gif") => "image/gif",
        _ => DEFAULT_MIME_TYPE,
    }
}
