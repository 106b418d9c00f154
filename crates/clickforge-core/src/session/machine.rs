//! The generation session state machine.
//!
//! `GenerationSession` performs no I/O. Every remote operation is split into a
//! `begin_*` call, which validates preconditions and occupies the in-flight
//! slot, and a `complete_*` call, which applies the response only if its
//! ticket still owns the slot.

use tracing::{debug, warn};

use crate::concept::{BrainstormOutcome, Concept, TrendSignal};
use crate::error::ClickforgeError;
use crate::image::ImageData;
use crate::params::{AspectRatio, GenerationParams};
use crate::thumbnail::{SeoBundle, Thumbnail};

use super::in_flight::{InFlightSlot, RequestKind, RequestTicket};
use super::status::{FailureKind, Rejection, SessionStatus, WorkflowStep};

/// Brainstorming request handed to the caller by [`GenerationSession::begin_analysis`].
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub ticket: RequestTicket,
    pub params: GenerationParams,
}

/// Rendering request for one concept.
///
/// `params` is the snapshot frozen into the resulting thumbnail.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub ticket: RequestTicket,
    pub concept: Concept,
    pub params: GenerationParams,
    pub reference: Option<ImageData>,
}

/// Refinement request for the active result.
#[derive(Debug, Clone)]
pub struct RefineRequest {
    pub ticket: RequestTicket,
    pub result_id: String,
    pub image: ImageData,
    pub instruction: String,
    pub aspect_ratio: AspectRatio,
}

/// What happened to a response handed back to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement<T> {
    /// The response was applied.
    Applied(T),
    /// The call failed; the session is now `Failed`.
    Failed(FailureKind),
    /// The ticket had been invalidated; nothing changed.
    Discarded,
}

impl<T> Settlement<T> {
    pub fn is_discarded(&self) -> bool {
        matches!(self, Settlement::Discarded)
    }
}

/// A refined image that replaced the active result's image.
#[derive(Debug, Clone, PartialEq)]
pub struct RefinedImage {
    pub result_id: String,
    pub image: ImageData,
}

/// Explicit state for one user's workspace.
#[derive(Debug, Clone, Default)]
pub struct GenerationSession {
    step: WorkflowStep,
    params: GenerationParams,
    reference_image: Option<ImageData>,
    status: SessionStatus,
    failure: Option<FailureKind>,
    concepts: Vec<Concept>,
    trends: Vec<TrendSignal>,
    active: Option<Thumbnail>,
    refine_text: String,
    slot: InFlightSlot,
}

impl GenerationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the given parameters instead of the built-in defaults.
    pub fn with_params(params: GenerationParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Live configuration. Edits never reach results already created.
    pub fn params_mut(&mut self) -> &mut GenerationParams {
        &mut self.params
    }

    pub fn set_params(&mut self, params: GenerationParams) {
        self.params = params;
    }

    pub fn reference_image(&self) -> Option<&ImageData> {
        self.reference_image.as_ref()
    }

    pub fn set_reference_image(&mut self, image: Option<ImageData>) {
        self.reference_image = image;
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    pub fn trends(&self) -> &[TrendSignal] {
        &self.trends
    }

    pub fn active(&self) -> Option<&Thumbnail> {
        self.active.as_ref()
    }

    pub fn refine_text(&self) -> &str {
        &self.refine_text
    }

    pub fn set_refine_text(&mut self, text: impl Into<String>) {
        self.refine_text = text.into();
    }

    pub fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    /// User facing message for the last failure, if the session is failed.
    pub fn failure_message(&self) -> Option<&'static str> {
        self.failure.map(|kind| kind.message())
    }

    /// Kind of the outstanding request, if any.
    pub fn pending(&self) -> Option<RequestKind> {
        self.slot.current().map(|ticket| ticket.kind())
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Switches the navigational mode.
    ///
    /// Leaving the current mode invalidates any outstanding request, unless
    /// `step` is where that request lands on success.
    pub fn navigate(&mut self, step: WorkflowStep) {
        if step == self.step {
            return;
        }
        if self.pending().and_then(|kind| kind.destination()) != Some(step) {
            self.invalidate_pending();
        }
        self.step = step;
    }

    /// Makes a stored result the active one (opening it from the vault).
    pub fn open_result(&mut self, result: Thumbnail) {
        self.active = Some(result);
        self.refine_text.clear();
        self.invalidate_pending();
        self.failure = None;
        self.status = SessionStatus::Completed;
    }

    /// Closes the active result workspace.
    pub fn close_result(&mut self) {
        if self.pending() == Some(RequestKind::Refinement) {
            self.invalidate_pending();
        }
        self.refine_text.clear();
        self.active = None;
        if self.status == SessionStatus::Completed {
            self.status = SessionStatus::Idle;
        }
    }

    /// Drops the outstanding request so its response will be discarded.
    ///
    /// Returns `true` if a request was pending.
    pub fn invalidate_pending(&mut self) -> bool {
        match self.slot.invalidate() {
            Some(ticket) => {
                debug!(request = %ticket.kind(), id = ticket.id(), "invalidated pending request");
                self.status = self.settled_status();
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Remote operations
    // ========================================================================

    /// Validates and starts brainstorming with the live parameters.
    pub fn begin_analysis(&mut self) -> Result<AnalysisRequest, Rejection> {
        if !self.params.has_topic() {
            return Err(Rejection::EmptyTopic);
        }
        self.ensure_idle()?;

        let ticket = self.issue(RequestKind::Analysis);
        Ok(AnalysisRequest {
            ticket,
            params: self.params.clone(),
        })
    }

    pub fn complete_analysis(
        &mut self,
        ticket: RequestTicket,
        outcome: crate::error::Result<BrainstormOutcome>,
    ) -> Settlement<usize> {
        if !self.settle(&ticket) {
            return Settlement::Discarded;
        }
        match outcome {
            Ok(BrainstormOutcome { concepts, trends }) => {
                let count = concepts.len();
                self.concepts = concepts;
                self.trends = trends;
                self.status = SessionStatus::Idle;
                self.step = WorkflowStep::Strategy;
                Settlement::Applied(count)
            }
            Err(err) => self.fail(FailureKind::AnalysisFailed, &err),
        }
    }

    /// Validates and starts rendering the concept with the given id.
    pub fn begin_render(&mut self, concept_id: &str) -> Result<RenderRequest, Rejection> {
        self.ensure_idle()?;
        let concept = self
            .concepts
            .iter()
            .find(|concept| concept.id == concept_id)
            .cloned()
            .ok_or_else(|| Rejection::UnknownConcept(concept_id.to_string()))?;

        let ticket = self.issue(RequestKind::ImageGeneration);
        Ok(RenderRequest {
            ticket,
            concept,
            params: self.params.clone(),
            reference: self.reference_image.clone(),
        })
    }

    /// Returns whether a response for `ticket` would still be applied.
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.slot.is_current(ticket)
    }

    /// Applies the rendered image and SEO bundle, creating a new result.
    pub fn complete_render(
        &mut self,
        request: RenderRequest,
        outcome: crate::error::Result<(ImageData, SeoBundle)>,
    ) -> Settlement<Thumbnail> {
        if !self.settle(&request.ticket) {
            return Settlement::Discarded;
        }
        match outcome {
            Ok((image, seo)) => {
                let thumbnail = Thumbnail::new(image, request.concept, seo, request.params);
                self.refine_text.clear();
                self.active = Some(thumbnail.clone());
                self.status = SessionStatus::Completed;
                Settlement::Applied(thumbnail)
            }
            Err(err) => self.fail(FailureKind::ImageGenerationFailed, &err),
        }
    }

    /// Validates and starts refining the active result.
    pub fn begin_refine(&mut self, instruction: &str) -> Result<RefineRequest, Rejection> {
        let active = self.active.as_ref().ok_or(Rejection::NoActiveResult)?;
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(Rejection::EmptyInstruction);
        }
        self.ensure_idle()?;

        let result_id = active.id.clone();
        let image = active.image.clone();
        let aspect_ratio = active.params.aspect_ratio;
        self.refine_text = instruction.to_string();
        let ticket = self.issue(RequestKind::Refinement);
        Ok(RefineRequest {
            ticket,
            result_id,
            image,
            instruction: instruction.to_string(),
            aspect_ratio,
        })
    }

    /// Replaces the active image with the refined one.
    pub fn complete_refine(
        &mut self,
        request: RefineRequest,
        outcome: crate::error::Result<ImageData>,
    ) -> Settlement<RefinedImage> {
        if !self.settle(&request.ticket) {
            return Settlement::Discarded;
        }
        match outcome {
            Ok(image) => match self.active.as_mut() {
                Some(active) if active.id == request.result_id => {
                    active.image = image.clone();
                    self.refine_text.clear();
                    self.status = SessionStatus::Completed;
                    Settlement::Applied(RefinedImage {
                        result_id: request.result_id,
                        image,
                    })
                }
                _ => {
                    warn!(result_id = %request.result_id, "refined result is no longer active");
                    self.status = self.settled_status();
                    Settlement::Discarded
                }
            },
            Err(err) => self.fail(FailureKind::RefinementFailed, &err),
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn ensure_idle(&self) -> Result<(), Rejection> {
        if self.slot.is_occupied() || self.status.is_in_flight() {
            return Err(Rejection::Busy(self.status));
        }
        Ok(())
    }

    fn issue(&mut self, kind: RequestKind) -> RequestTicket {
        let ticket = self.slot.issue(kind);
        self.failure = None;
        self.status = kind.status();
        ticket
    }

    fn settle(&mut self, ticket: &RequestTicket) -> bool {
        let settled = self.slot.settle(ticket);
        if !settled {
            debug!(request = %ticket.kind(), id = ticket.id(), "dropping response for stale request");
        }
        settled
    }

    fn fail<T>(&mut self, kind: FailureKind, err: &ClickforgeError) -> Settlement<T> {
        warn!(failure = %kind, error = %err, "remote operation failed");
        self.failure = Some(kind);
        self.status = SessionStatus::Failed;
        Settlement::Failed(kind)
    }

    fn settled_status(&self) -> SessionStatus {
        if self.active.is_some() {
            SessionStatus::Completed
        } else {
            SessionStatus::Idle
        }
    }
}
