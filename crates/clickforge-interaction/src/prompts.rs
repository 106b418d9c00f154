//! Prompt templates sent to the models.

use clickforge_core::concept::Concept;
use clickforge_core::{ClickforgeError, GenerationParams, Result};
use minijinja::{Environment, context};

const BRAINSTORM: &str = r#"Advanced Content Strategy Analysis:
Topic: "{{ topic }}"
Target Audience: "{{ audience }}"
Goal: "{{ goal }}"
Brand Aesthetic: "{{ style }}"
Viral Strategy: {% if viral %}FOCUS ON MRBEAST STYLE: Exaggerated situations, extreme contrast, high-stakes curiosity gaps, and vibrant, saturated visuals. Think 'I spent 24 hours in...' or 'Last to leave...' energy.{% else %}Focus on professional, clean, and high-conversion business aesthetics.{% endif %}

{% if search %}Step 1: Use Google Search to identify current high-performing thumbnail trends for this topic.
{% else %}Step 1: Recall current high-performing thumbnail trends for this topic.
{% endif -%}
Step 2: Brainstorm {{ count }} distinct visual concepts that exploit current psychological triggers (e.g. pattern interrupt, curiosity gap, extreme facial expressions).
Step 3: For each concept, provide:
  - A visual prompt for an image generator.
  - A main overlay text (3-4 words max) that should be IN THE IMAGE.
  - 5 alternative catchy "viral" overlay variants.
  - A professional color palette and audience sentiment analysis."#;

const RENDER: &str = "{% if viral %}MrBeast thumbnail style, hyper-saturated colors, exaggerated facial expressions, extremely high contrast, vibrant backgrounds, clear large subject in foreground, shallow depth of field, bright lighting, high-energy, eye-catching.{% else %}Professional cinematic quality, photorealistic, balanced colors, sharp focus.{% endif %} Subject: {{ prompt }}. {{ style }} style. Lighting: {{ lighting }}. Angle: {{ angle }}. 8k resolution, cinematic, trending on social media.{% if reference %} Use the provided image as a strong structural reference.{% endif %}";

const REFINE: &str = "Modify this thumbnail asset: {{ instruction }}. Enhance visual hierarchy, increase saturation where appropriate, and ensure high clarity for small screens.";

const SEO: &str = r#"Based on the thumbnail concept "{{ title }}" for the topic "{{ topic }}", generate {{ title_count }} viral video titles and {{ tag_count }} high-search-volume SEO tags."#;

/// Compiled prompt templates.
pub struct PromptTemplates {
    env: Environment<'static>,
}

impl PromptTemplates {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in [
            ("brainstorm", BRAINSTORM),
            ("render", RENDER),
            ("refine", REFINE),
            ("seo", SEO),
        ] {
            env.add_template(name, source).map_err(template_error)?;
        }
        Ok(Self { env })
    }

    /// Research and concept brief for the strategy model.
    pub fn brainstorm(
        &self,
        params: &GenerationParams,
        concept_count: usize,
        google_search: bool,
    ) -> Result<String> {
        self.render(
            "brainstorm",
            context! {
                topic => params.topic.trim(),
                audience => &params.audience,
                goal => &params.goal,
                style => &params.style,
                viral => params.viral_mode,
                search => google_search,
                count => concept_count,
            },
        )
    }

    /// Full image prompt for a concept's visual prompt.
    pub fn render_image(
        &self,
        prompt: &str,
        params: &GenerationParams,
        has_reference: bool,
    ) -> Result<String> {
        self.render(
            "render",
            context! {
                prompt => prompt,
                style => &params.style,
                lighting => &params.lighting,
                angle => &params.angle,
                viral => params.viral_mode,
                reference => has_reference,
            },
        )
    }

    pub fn refine(&self, instruction: &str) -> Result<String> {
        self.render("refine", context! { instruction => instruction.trim() })
    }

    pub fn seo(
        &self,
        concept: &Concept,
        params: &GenerationParams,
        title_count: usize,
        tag_count: usize,
    ) -> Result<String> {
        self.render(
            "seo",
            context! {
                title => &concept.title,
                topic => params.topic.trim(),
                title_count => title_count,
                tag_count => tag_count,
            },
        )
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(ctx))
            .map_err(template_error)
    }
}

fn template_error(err: minijinja::Error) -> ClickforgeError {
    ClickforgeError::internal(format!("prompt template error: {err}"))
}
