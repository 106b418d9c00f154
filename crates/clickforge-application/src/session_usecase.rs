//! Session use case implementation.
//!
//! `SessionUseCase` owns the [`GenerationSession`] and drives its remote
//! operations against the [`StudioService`], recording finished results in
//! the [`HistoryStore`].

use std::sync::Arc;

use clickforge_core::session::{FailureKind, RefinedImage, Rejection, Settlement};
use clickforge_core::{
    ClickforgeError, GenerationParams, GenerationSession, ImageData, ParamField, Result,
    StudioService, Thumbnail, WorkflowStep,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::history::HistoryStore;

/// How a remote operation ended, from the caller's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome<T> {
    /// The operation finished and its result was applied.
    Completed(T),
    /// The collaborator failed; the session shows the failure message.
    Failed(FailureKind),
    /// Preconditions were not met; nothing changed.
    Rejected(Rejection),
    /// The user moved on before the response arrived; it was dropped.
    Discarded,
}

impl<T> OperationOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, OperationOutcome::Completed(_))
    }

    fn from_settlement(settlement: Settlement<T>) -> Self {
        match settlement {
            Settlement::Applied(value) => OperationOutcome::Completed(value),
            Settlement::Failed(kind) => OperationOutcome::Failed(kind),
            Settlement::Discarded => OperationOutcome::Discarded,
        }
    }
}

/// Use case for one user's generation workspace.
///
/// The session lock is only held for the synchronous state transitions on
/// either side of a collaborator call, never across the call itself.
pub struct SessionUseCase {
    session: Arc<Mutex<GenerationSession>>,
    studio: Arc<dyn StudioService>,
    history: Arc<HistoryStore>,
}

impl SessionUseCase {
    pub fn new(
        studio: Arc<dyn StudioService>,
        history: Arc<HistoryStore>,
        defaults: GenerationParams,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(GenerationSession::with_params(defaults))),
            studio,
            history,
        }
    }

    pub fn history(&self) -> &Arc<HistoryStore> {
        &self.history
    }

    /// A copy of the current session state for display.
    pub async fn snapshot(&self) -> GenerationSession {
        self.session.lock().await.clone()
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Applies an arbitrary edit to the live parameters.
    pub async fn update_params(&self, edit: impl FnOnce(&mut GenerationParams)) {
        edit(self.session.lock().await.params_mut());
    }

    /// Sets one parameter by name.
    pub async fn set_param(&self, field: ParamField, value: &str) -> Result<()> {
        self.session.lock().await.params_mut().set_field(field, value)
    }

    /// Flips viral mode, returning the new value.
    pub async fn toggle_viral_mode(&self) -> bool {
        let mut session = self.session.lock().await;
        let params = session.params_mut();
        params.viral_mode = !params.viral_mode;
        params.viral_mode
    }

    pub async fn set_reference_image(&self, image: ImageData) {
        self.session.lock().await.set_reference_image(Some(image));
    }

    pub async fn clear_reference_image(&self) {
        self.session.lock().await.set_reference_image(None);
    }

    pub async fn set_refine_text(&self, text: &str) {
        self.session.lock().await.set_refine_text(text);
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub async fn navigate(&self, step: WorkflowStep) {
        self.session.lock().await.navigate(step);
    }

    /// Makes the vault entry with `id` the active result.
    pub async fn open_result(&self, id: &str) -> Result<Thumbnail> {
        let entry = self
            .history
            .get(id)
            .await
            .ok_or_else(|| ClickforgeError::not_found("result", id))?;
        self.session.lock().await.open_result(entry.clone());
        Ok(entry)
    }

    pub async fn close_result(&self) {
        self.session.lock().await.close_result();
    }

    // ========================================================================
    // Remote operations
    // ========================================================================

    /// Brainstorms concepts for `params`, which become the live parameters.
    ///
    /// Returns the number of concepts on success.
    pub async fn start_analysis(&self, params: GenerationParams) -> OperationOutcome<usize> {
        let request = {
            let mut session = self.session.lock().await;
            let previous = session.params().clone();
            session.set_params(params);
            match session.begin_analysis() {
                Ok(request) => request,
                Err(rejection) => {
                    session.set_params(previous);
                    debug!(%rejection, "analysis rejected");
                    return OperationOutcome::Rejected(rejection);
                }
            }
        };

        info!(topic = %request.params.topic, "starting market analysis");
        let outcome = self.studio.brainstorm(&request.params).await;

        let settlement = self
            .session
            .lock()
            .await
            .complete_analysis(request.ticket, outcome);
        OperationOutcome::from_settlement(settlement)
    }

    /// Renders the concept with `concept_id` and records the new result.
    ///
    /// An `Err` means the result was created but could not be persisted.
    pub async fn select_concept(&self, concept_id: &str) -> Result<OperationOutcome<Thumbnail>> {
        let request = match self.session.lock().await.begin_render(concept_id) {
            Ok(request) => request,
            Err(rejection) => return Ok(OperationOutcome::Rejected(rejection)),
        };

        info!(concept = %request.concept.title, "rendering concept");
        let outcome = match self
            .studio
            .render_image(
                &request.concept.visual_prompt,
                request.params.aspect_ratio,
                &request.params,
                request.reference.as_ref(),
            )
            .await
        {
            Ok(image) => {
                if !self.session.lock().await.is_current(&request.ticket) {
                    debug!("render superseded, skipping SEO");
                    return Ok(OperationOutcome::Discarded);
                }
                self.studio
                    .generate_seo(&request.concept, &request.params)
                    .await
                    .map(|seo| (image, seo))
            }
            Err(err) => Err(err),
        };

        let settlement = self.session.lock().await.complete_render(request, outcome);
        if let Settlement::Applied(result) = &settlement {
            self.history.append(result.clone()).await?;
            info!(id = %result.id, "result stored in vault");
        }
        Ok(OperationOutcome::from_settlement(settlement))
    }

    /// Applies `instruction` to the active result's image.
    ///
    /// The matching vault entry is updated too. An `Err` means the refinement
    /// was applied but could not be persisted.
    pub async fn refine_active(&self, instruction: &str) -> Result<OperationOutcome<RefinedImage>> {
        let request = match self.session.lock().await.begin_refine(instruction) {
            Ok(request) => request,
            Err(rejection) => return Ok(OperationOutcome::Rejected(rejection)),
        };

        info!(id = %request.result_id, "refining active result");
        let outcome = self
            .studio
            .refine(&request.image, &request.instruction, request.aspect_ratio)
            .await;

        let settlement = self.session.lock().await.complete_refine(request, outcome);
        if let Settlement::Applied(refined) = &settlement {
            self.history
                .replace_image(&refined.result_id, refined.image.clone())
                .await?;
        }
        Ok(OperationOutcome::from_settlement(settlement))
    }

    /// Empties the vault. Confirmation is the caller's job.
    pub async fn clear_history(&self) -> Result<()> {
        self.history.clear().await
    }
}
