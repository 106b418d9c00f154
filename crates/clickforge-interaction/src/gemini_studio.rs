//! GeminiStudio - direct REST implementation of [`StudioService`].
//!
//! Strategy and SEO calls ask for structured JSON; rendering and refinement
//! ask the image model for a single inline image.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clickforge_core::concept::ConceptDraft;
use clickforge_core::config::{GeminiSettings, RootConfig, StudioSettings};
use clickforge_core::{
    AspectRatio, BrainstormOutcome, ClickforgeError, Concept, GenerationParams, ImageData, Result,
    SeoBundle, StudioService,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::prompts::PromptTemplates;
use crate::wire::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part, map_http_error,
    parse_retry_after, strip_json_fence,
};

/// Studio collaborator backed by the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiStudio {
    client: Client,
    api_key: String,
    gemini: GeminiSettings,
    studio: StudioSettings,
    prompts: Arc<PromptTemplates>,
}

impl GeminiStudio {
    /// Creates a studio using the models and limits from `config`.
    pub fn new(api_key: impl Into<String>, config: &RootConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.gemini.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            gemini: config.gemini.clone(),
            studio: config.studio.clone(),
            prompts: Arc::new(PromptTemplates::new()?),
        })
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.gemini
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!(
            "{}/{model}:generateContent",
            self.gemini.base_url.trim_end_matches('/')
        );
        debug!(model, "sending generateContent request");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text, retry_after));
        }

        response.json::<GenerateContentResponse>().await.map_err(|err| {
            ClickforgeError::service(format!("Failed to parse Gemini response: {err}"))
        })
    }

    async fn generate_image(&self, parts: Vec<Part>, aspect_ratio: AspectRatio) -> Result<ImageData> {
        let request = GenerateContentRequest::user(parts)
            .with_config(GenerationConfig::image(aspect_ratio.as_str()));
        let response = self.generate(&self.gemini.image_model, &request).await?;
        response.image()
    }
}

#[async_trait]
impl StudioService for GeminiStudio {
    async fn brainstorm(&self, params: &GenerationParams) -> Result<BrainstormOutcome> {
        let prompt = self.prompts.brainstorm(
            params,
            self.studio.concept_count,
            self.gemini.google_search,
        )?;
        let mut request = GenerateContentRequest::user(vec![Part::text(prompt)])
            .with_config(GenerationConfig::json(concepts_schema()));
        if self.gemini.google_search {
            request = request.with_google_search();
        }

        let response = self.generate(&self.gemini.strategy_model, &request).await?;
        let concepts = parse_concepts(&response.text()?, self.studio.concept_count)?;
        let trends = response.trends();
        info!(
            concepts = concepts.len(),
            trends = trends.len(),
            "brainstorm finished"
        );
        Ok(BrainstormOutcome { concepts, trends })
    }

    async fn render_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        params: &GenerationParams,
        reference: Option<&ImageData>,
    ) -> Result<ImageData> {
        let text = self
            .prompts
            .render_image(prompt, params, reference.is_some())?;
        let mut parts = Vec::with_capacity(2);
        if let Some(reference) = reference {
            parts.push(Part::image(reference));
        }
        parts.push(Part::text(text));
        self.generate_image(parts, aspect_ratio).await
    }

    async fn refine(
        &self,
        image: &ImageData,
        instruction: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<ImageData> {
        let text = self.prompts.refine(instruction)?;
        self.generate_image(vec![Part::image(image), Part::text(text)], aspect_ratio)
            .await
    }

    async fn generate_seo(
        &self,
        concept: &Concept,
        params: &GenerationParams,
    ) -> Result<SeoBundle> {
        let prompt = self.prompts.seo(
            concept,
            params,
            self.studio.seo_title_count,
            self.studio.seo_tag_count,
        )?;
        let request = GenerateContentRequest::user(vec![Part::text(prompt)])
            .with_config(GenerationConfig::json(seo_schema()));
        let response = self.generate(&self.gemini.seo_model, &request).await?;
        parse_seo(&response.text()?)
    }
}

#[derive(Deserialize)]
struct ConceptsEnvelope {
    #[serde(default)]
    concepts: Vec<ConceptDraft>,
}

/// Parses the brainstorm answer into identified concepts.
///
/// An empty list is an error; extra concepts beyond `limit` are dropped.
fn parse_concepts(text: &str, limit: usize) -> Result<Vec<Concept>> {
    let envelope: ConceptsEnvelope = serde_json::from_str(strip_json_fence(text))?;
    let mut drafts = envelope.concepts;
    if drafts.len() > limit {
        debug!(received = drafts.len(), limit, "dropping extra concepts");
        drafts.truncate(limit);
    } else if drafts.len() < limit {
        warn!(received = drafts.len(), expected = limit, "fewer concepts than requested");
    }
    if drafts.is_empty() {
        return Err(ClickforgeError::service("brainstorm returned no concepts"));
    }
    Ok(drafts.into_iter().map(Concept::from_draft).collect())
}

fn parse_seo(text: &str) -> Result<SeoBundle> {
    Ok(serde_json::from_str(strip_json_fence(text))?)
}

fn concepts_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "concepts": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "visualPrompt": { "type": "STRING" },
                        "overlayText": { "type": "STRING" },
                        "overlayVariants": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "psychology": { "type": "STRING" },
                        "colorPalette": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "audienceSentiment": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "segment": { "type": "STRING" },
                                    "reaction": { "type": "STRING" }
                                }
                            }
                        }
                    },
                    "required": [
                        "title", "description", "visualPrompt", "overlayText",
                        "overlayVariants", "psychology", "colorPalette", "audienceSentiment"
                    ]
                }
            }
        },
        "required": ["concepts"]
    })
}

fn seo_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "suggestedTitles": { "type": "ARRAY", "items": { "type": "STRING" } },
            "tags": { "type": "ARRAY", "items": { "type": "STRING" } }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept_json(title: &str) -> String {
        format!(
            r##"{{"title":"{title}","description":"d","visualPrompt":"p","overlayText":"10K?",
                "overlayVariants":["a","b"],"psychology":"curiosity gap",
                "colorPalette":["#FF0000"],
                "audienceSentiment":[{{"segment":"Founders","reaction":"Must click"}}]}}"##
        )
    }

    fn concepts_answer(titles: &[&str]) -> String {
        let items: Vec<String> = titles.iter().map(|t| concept_json(t)).collect();
        format!(r#"{{"concepts":[{}]}}"#, items.join(","))
    }

    #[test]
    fn test_parse_concepts_assigns_unique_ids() {
        let concepts = parse_concepts(&concepts_answer(&["one", "two", "three"]), 3).unwrap();
        assert_eq!(concepts.len(), 3);
        assert_eq!(concepts[0].title, "one");
        assert_eq!(concepts[0].audience_sentiment[0].segment, "Founders");
        assert!(concepts[0].id.starts_with("concept-"));
        assert_ne!(concepts[0].id, concepts[1].id);
    }

    #[test]
    fn test_parse_concepts_truncates_and_accepts_fewer() {
        let many = parse_concepts(&concepts_answer(&["a", "b", "c", "d"]), 3).unwrap();
        assert_eq!(many.len(), 3);
        let few = parse_concepts(&concepts_answer(&["a"]), 3).unwrap();
        assert_eq!(few.len(), 1);
    }

    #[test]
    fn test_parse_concepts_rejects_empty_or_malformed() {
        assert!(parse_concepts(r#"{"concepts":[]}"#, 3).unwrap_err().is_service());
        assert!(parse_concepts("not json", 3).unwrap_err().is_serialization());
        // a concept missing required fields is a shape error
        assert!(parse_concepts(r#"{"concepts":[{"title":"x"}]}"#, 3).is_err());
    }

    #[test]
    fn test_parse_concepts_zero_limit_is_not_a_success() {
        let err = parse_concepts(&concepts_answer(&["one"]), 0).unwrap_err();
        assert!(err.is_service());
    }

    #[test]
    fn test_parse_concepts_accepts_fenced_json() {
        let fenced = format!("```json\n{}\n```", concepts_answer(&["one"]));
        assert_eq!(parse_concepts(&fenced, 3).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_seo() {
        let seo = parse_seo(r#"{"suggestedTitles":["How I hit 10k"],"tags":["saas","mrr"]}"#)
            .unwrap();
        assert_eq!(seo.suggested_titles, vec!["How I hit 10k"]);
        assert_eq!(seo.tags.len(), 2);
        assert_eq!(parse_seo("{}").unwrap(), SeoBundle::default());
    }

    #[test]
    fn test_schema_requires_every_concept_field() {
        let schema = concepts_schema();
        let required = schema["properties"]["concepts"]["items"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(required.len(), 8);
        assert_eq!(seo_schema()["properties"]["tags"]["type"], "ARRAY");
    }

    #[tokio::test]
    async fn test_new_uses_configured_models() {
        let mut config = RootConfig::default();
        config.gemini.image_model = "custom-image".into();
        let studio = GeminiStudio::new("key", &config).unwrap();
        assert_eq!(studio.settings().image_model, "custom-image");
        assert_eq!(studio.settings().strategy_model, "gemini-3-pro-preview");
    }
}
