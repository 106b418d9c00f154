//! Contract of the generative service the session talks to.

use async_trait::async_trait;

use crate::concept::{BrainstormOutcome, Concept};
use crate::error::Result;
use crate::image::ImageData;
use crate::params::{AspectRatio, GenerationParams};
use crate::thumbnail::SeoBundle;

/// The four remote operations behind the thumbnail workflow.
///
/// Implementations talk to a hosted multimodal model. Any failure (network,
/// service rejection, unparseable response) is reported as an error; the
/// session does not distinguish between causes.
#[async_trait]
pub trait StudioService: Send + Sync {
    /// Researches the topic and proposes thumbnail concepts.
    ///
    /// Returned concepts already carry unique ids.
    async fn brainstorm(&self, params: &GenerationParams) -> Result<BrainstormOutcome>;

    /// Renders a concept prompt into an image.
    ///
    /// `reference`, when given, is used as a structural conditioning input.
    async fn render_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        params: &GenerationParams,
        reference: Option<&ImageData>,
    ) -> Result<ImageData>;

    /// Applies a text-described edit to an existing image.
    async fn refine(
        &self,
        image: &ImageData,
        instruction: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<ImageData>;

    /// Suggests video titles and search tags for a concept.
    async fn generate_seo(&self, concept: &Concept, params: &GenerationParams)
    -> Result<SeoBundle>;
}
