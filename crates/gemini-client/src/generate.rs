//! Wire types for the `models/{model}:generateContent` endpoint.

use analysis_core::ModelRequest;
use serde::{Deserialize, Serialize};

use crate::error::{GeminiError, GeminiResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

impl From<&ModelRequest> for GenerateContentRequest {
    /// Images go first, then the prompt text, in a single user turn
    fn from(request: &ModelRequest) -> Self {
        let mut parts: Vec<Part> = request
            .images
            .iter()
            .map(|image| Part::inline(image.mime_type.clone(), image.data.clone()))
            .collect();
        parts.push(Part::text(request.prompt.clone()));

        let system_instruction = (!request.system_instruction.is_empty()).then(|| Content {
            role: None,
            parts: vec![Part::text(request.system_instruction.clone())],
        });

        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            system_instruction,
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    pub fn text(&self) -> GeminiResult<String> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(GeminiError::Blocked(reason));
        }

        let candidate = self.candidates.first().ok_or(GeminiError::EmptyResponse)?;
        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            return match candidate.finish_reason.as_deref() {
                Some(reason) if reason != "STOP" => Err(GeminiError::Blocked(reason.to_string())),
                _ => Err(GeminiError::EmptyResponse),
            };
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::EncodedImage;
    use serde_json::json;

    fn model_request() -> ModelRequest {
        ModelRequest {
            system_instruction: "You are the analysis engine.".to_string(),
            prompt: "MODE: STOCK (Single Chart)".to_string(),
            images: vec![EncodedImage {
                mime_type: "image/png".to_string(),
                data: "iVBORw0KGgo=".to_string(),
            }],
            temperature: 0.6,
        }
    }

    #[test]
    fn test_request_wire_shape() {
        let body = serde_json::to_value(GenerateContentRequest::from(&model_request())).unwrap();

        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "iVBORw0KGgo=");
        assert!(parts[0].get("text").is_none());
        assert_eq!(parts[1]["text"], "MODE: STOCK (Single Chart)");
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are the analysis engine."
        );
        let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_text_only_request() {
        let mut request = model_request();
        request.images.clear();
        let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "## Report\n"}, {"text": "{\"riskScore\": 40}"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(response.text().unwrap(), "## Report\n{\"riskScore\": 40}");
    }

    #[test]
    fn test_blocked_prompt() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        assert!(matches!(response.text(), Err(GeminiError::Blocked(r)) if r == "SAFETY"));
    }

    #[test]
    fn test_no_candidates() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(response.text(), Err(GeminiError::EmptyResponse)));
    }

    #[test]
    fn test_empty_candidate_with_finish_reason() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "RECITATION"}]
        }))
        .unwrap();
        assert!(matches!(response.text(), Err(GeminiError::Blocked(r)) if r == "RECITATION"));
    }
}
