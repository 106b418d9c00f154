//! Request and response shapes of the Gemini `generateContent` endpoint.

use std::time::Duration;

use clickforge_core::image::DEFAULT_IMAGE_MIME;
use clickforge_core::{ClickforgeError, ImageData, Result, TrendSignal};
use reqwest::StatusCode;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A single user turn with the given parts.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            tools: Vec::new(),
            generation_config: None,
        }
    }

    pub fn with_google_search(mut self) -> Self {
        self.tools.push(Tool {
            google_search: GoogleSearch {},
        });
        self
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Inline image part built from a data URL.
    pub fn image(image: &ImageData) -> Self {
        Part::InlineData {
            inline_data: InlineDataPayload {
                mime_type: image.mime_type().to_string(),
                data: image.base64_payload().to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineDataPayload {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct Tool {
    #[serde(rename = "googleSearch")]
    pub google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
pub(crate) struct GoogleSearch {}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

impl GenerationConfig {
    /// Structured JSON output following `schema`.
    pub fn json(schema: serde_json::Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            ..Default::default()
        }
    }

    /// Image output with the given aspect ratio.
    pub fn image(aspect_ratio: &str) -> Self {
        Self {
            response_modalities: Some(vec!["IMAGE".to_string()]),
            image_config: Some(ImageConfig {
                aspect_ratio: aspect_ratio.to_string(),
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageConfig {
    pub aspect_ratio: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub content: Option<ContentResponse>,
    pub grounding_metadata: Option<GroundingMetadata>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentResponse {
    #[serde(default)]
    pub parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PartResponse {
    pub text: Option<String>,
    #[serde(alias = "inline_data")]
    pub inline_data: Option<InlineDataResponse>,
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineDataResponse {
    #[serde(alias = "mime_type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[PartResponse] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Explains an empty answer using the block reason or finish reason.
    fn empty_reason(&self, what: &str) -> ClickforgeError {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            return ClickforgeError::service(format!("prompt blocked ({reason})"));
        }
        match self
            .candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
        {
            Some(reason) => ClickforgeError::service(format!("no {what} in response (finish reason {reason})")),
            None => ClickforgeError::service(format!("no {what} in response")),
        }
    }

    /// Concatenated answer text of the first candidate, excluding thoughts.
    pub fn text(&self) -> Result<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            return Err(self.empty_reason("text"));
        }
        Ok(text)
    }

    /// First inline image of the first candidate.
    pub fn image(&self) -> Result<ImageData> {
        self.first_parts()
            .iter()
            .filter_map(|part| part.inline_data.as_ref())
            .find(|inline| !inline.data.is_empty())
            .map(|inline| {
                let mime = inline.mime_type.as_deref().unwrap_or(DEFAULT_IMAGE_MIME);
                ImageData::from_base64(mime, &inline.data)
            })
            .ok_or_else(|| self.empty_reason("image"))
    }

    /// Web sources the answer was grounded on.
    pub fn trends(&self) -> Vec<TrendSignal> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.grounding_metadata.as_ref())
            .map(|metadata| {
                metadata
                    .grounding_chunks
                    .iter()
                    .filter_map(|chunk| chunk.web.as_ref())
                    .filter_map(|web| {
                        let uri = web.uri.clone()?;
                        let title = web.title.clone().unwrap_or_else(|| uri.clone());
                        Some(TrendSignal { title, uri })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Strips a Markdown code fence some models wrap JSON answers in.
pub(crate) fn strip_json_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub(crate) fn map_http_error(
    status: StatusCode,
    body: &str,
    retry_after: Option<Duration>,
) -> ClickforgeError {
    let mut message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    if let Some(delay) = retry_after {
        message.push_str(&format!(" (retry after {}s)", delay.as_secs()));
    }
    ClickforgeError::service_status(status.as_u16(), message)
}

pub(crate) fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clickforge_core::AspectRatio;

    fn response(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_image_request_layout() {
        let source = ImageData::from_base64("image/jpeg", "AAAA");
        let request = GenerateContentRequest::user(vec![Part::image(&source), Part::text("make it pop")])
            .with_config(GenerationConfig::image(AspectRatio::Portrait.as_str()));
        let value = serde_json::to_value(&request).unwrap();

        let parts = &value["contents"][0]["parts"];
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "AAAA");
        assert_eq!(parts[1]["text"], "make it pop");
        assert_eq!(value["generationConfig"]["imageConfig"]["aspectRatio"], "9:16");
        assert_eq!(value["generationConfig"]["responseModalities"][0], "IMAGE");
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn test_search_request_layout() {
        let request = GenerateContentRequest::user(vec![Part::text("research")])
            .with_google_search()
            .with_config(GenerationConfig::json(serde_json::json!({"type": "OBJECT"})));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["tools"][0]["googleSearch"], serde_json::json!({}));
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_extracts_first_inline_image() {
        let parsed = response(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"Here you go"},
                {"inlineData":{"mimeType":"image/png","data":"iVBORw0KGgo="}}
            ]}}]}"#,
        );
        let image = parsed.image().unwrap();
        assert_eq!(image.as_data_url(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let parsed = response(
            r#"{"candidates":[{"content":{"parts":[{"text":"I cannot draw that"}]},
                "finishReason":"STOP"}]}"#,
        );
        let err = parsed.image().unwrap_err();
        assert!(err.is_service());
        assert!(err.to_string().contains("no image"));

        let blocked = response(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        assert!(blocked.image().unwrap_err().to_string().contains("SAFETY"));
    }

    #[test]
    fn test_text_skips_thoughts() {
        let parsed = response(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"thinking...","thought":true},
                {"text":"{\"a\":"},{"text":"1}"}
            ]}}]}"#,
        );
        assert_eq!(parsed.text().unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_trends_from_grounding_chunks() {
        let parsed = response(
            r#"{"candidates":[{"content":{"parts":[{"text":"{}"}]},
                "groundingMetadata":{"groundingChunks":[
                    {"web":{"uri":"https://a.example","title":"A"}},
                    {"web":{"uri":"https://b.example"}},
                    {"retrievedContext":{}}
                ]}}]}"#,
        );
        let trends = parsed.trends();
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].title, "A");
        assert_eq!(trends[1].title, "https://b.example");
    }

    #[test]
    fn test_strip_json_fence() {
        assert_eq!(strip_json_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_json_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_map_http_error_uses_error_body() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body, Some(Duration::from_secs(30)));
        assert_eq!(
            err.to_string(),
            "Service error (429): RESOURCE_EXHAUSTED: Quota exceeded (retry after 30s)"
        );

        let plain = map_http_error(StatusCode::BAD_GATEWAY, "upstream down", None);
        assert_eq!(plain.to_string(), "Service error (502): upstream down");
    }

    #[test]
    fn test_parse_retry_after() {
        let header = HeaderValue::from_static("12");
        assert_eq!(parse_retry_after(Some(&header)), Some(Duration::from_secs(12)));
        let date = HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_retry_after(Some(&date)), None);
        assert_eq!(parse_retry_after(None), None);
    }
}
