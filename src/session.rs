//! The analysis session: one claim's annotation store plus the interaction
//! state machine that edits it.
//!
//! All input arrives as discrete events (pointer down/move/up, clicks,
//! button presses). Events that make no sense in the current state are
//! ignored. The view reads everything it draws from [`AnalysisSession::render`].
//!
//! ```text
//! Idle --arm--> AwaitingFirstDragPoint --down--> Dragging --up--> Editing | Idle
//! Idle --double-click--> ManualEntryOpen --save/cancel--> Idle
//! Idle --edit--> Editing --save/cancel--> Idle
//! Idle --delete--> ConfirmingDelete --confirm/cancel--> Idle
//! ```

use crate::annotation::AnnotationStore;
use crate::config::EngineConfig;
use crate::constants::REVIEW_DUE_IN;
use crate::fraud::{self, FraudAssessment, FraudPolicy, RandomSource};
use crate::geometry::{Point, Rect};
use crate::interaction::{CursorHint, EditForm, InteractionState, ManualEntryForm};
use crate::model::{
    AnnotationId, AnnotationPatch, DamageAnnotation, ReviewTask, Severity, TaskPriority, TaskType,
};
use crate::persistence::{ClaimStore, StoreError};

/// Everything the view needs to draw one frame.
#[derive(Debug)]
pub struct AnalysisView<'a> {
    /// Annotations on the active image, in drawing order
    pub annotations: Vec<&'a DamageAnnotation>,
    pub selected: Option<AnnotationId>,
    pub state: &'a InteractionState,
    /// Uncommitted rectangle while dragging
    pub draft: Option<Rect>,
    pub cursor: CursorHint,
}

/// Annotation session for one claim.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    claim_id: String,
    active_image: String,
    store: AnnotationStore,
    state: InteractionState,
    min_draft_size: f32,
    manual_box_size: f32,
}

impl AnalysisSession {
    /// Empty session showing `image_id`.
    pub fn new(claim_id: impl Into<String>, image_id: impl Into<String>, config: &EngineConfig) -> Self {
        Self::with_store(claim_id, image_id, AnnotationStore::new(), config)
    }

    pub fn with_store(
        claim_id: impl Into<String>,
        image_id: impl Into<String>,
        store: AnnotationStore,
        config: &EngineConfig,
    ) -> Self {
        Self {
            claim_id: claim_id.into(),
            active_image: image_id.into(),
            store,
            state: InteractionState::Idle,
            min_draft_size: config.min_draft_size,
            manual_box_size: config.manual_box_size,
        }
    }

    /// Resume a claim from its saved annotations.
    pub fn resume<S: ClaimStore + ?Sized>(
        store: &S,
        claim_id: &str,
        image_id: impl Into<String>,
        config: &EngineConfig,
    ) -> Self {
        let annotations = store.load_annotations(claim_id);
        log::info!("Resumed {} with {} saved annotations", claim_id, annotations.len());
        Self::with_store(
            claim_id,
            image_id,
            AnnotationStore::from_annotations(annotations),
            config,
        )
    }

    pub fn claim_id(&self) -> &str {
        &self.claim_id
    }

    pub fn active_image(&self) -> &str {
        &self.active_image
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn annotations_mut(&mut self) -> &mut AnnotationStore {
        &mut self.store
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.store.selected()
    }

    fn transition(&mut self, next: InteractionState) {
        log::debug!("Interaction: {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    fn ignore(&self, event: &str) {
        log::trace!("Ignoring {} while {}", event, self.state.name());
    }

    /// Show another image. Only allowed while idle; clears the selection.
    pub fn set_active_image(&mut self, image_id: impl Into<String>) -> bool {
        if self.state != InteractionState::Idle {
            self.ignore("image switch");
            return false;
        }
        self.active_image = image_id.into();
        self.store.select(None);
        true
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// "Add Assessment": the next pointer-down on the image starts a box.
    pub fn arm_drawing(&mut self) {
        if self.state == InteractionState::Idle {
            self.transition(InteractionState::AwaitingFirstDragPoint);
        } else {
            self.ignore("arm");
        }
    }

    /// Disarm without drawing.
    pub fn cancel_drawing(&mut self) {
        if self.state.is_drawing() {
            self.transition(InteractionState::Idle);
        }
    }

    pub fn pointer_down(&mut self, at: Point) {
        if self.state == InteractionState::AwaitingFirstDragPoint {
            self.transition(InteractionState::Dragging {
                anchor: at,
                current: at,
            });
        } else {
            self.ignore("pointer down");
        }
    }

    /// Track the pointer while dragging. Returns the live draft rectangle.
    pub fn pointer_move(&mut self, at: Point) -> Option<Rect> {
        match &mut self.state {
            InteractionState::Dragging { current, .. } => {
                *current = at;
                self.state.draft()
            }
            _ => None,
        }
    }

    /// Release the pointer. A large enough draft becomes a new annotation,
    /// which is selected and opened for editing; anything smaller is
    /// discarded.
    pub fn pointer_up(&mut self, at: Point) -> Option<AnnotationId> {
        let InteractionState::Dragging { anchor, .. } = self.state else {
            self.ignore("pointer up");
            return None;
        };

        let rect = Rect::from_drag(anchor, at);
        if !rect.exceeds(self.min_draft_size) {
            log::debug!(
                "Discarding draft {:.1}x{:.1} (minimum {})",
                rect.width,
                rect.height,
                self.min_draft_size
            );
            self.transition(InteractionState::Idle);
            return None;
        }

        let id = self
            .store
            .add(DamageAnnotation::drawn(self.active_image.clone(), rect));
        self.store.select(Some(id));
        self.open_editor(id);
        Some(id)
    }

    /// The pointer left the drawing surface; handled like a release there.
    pub fn pointer_leave(&mut self, at: Point) -> Option<AnnotationId> {
        self.pointer_up(at)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Click on an existing box: toggles its selection. Suppressed while
    /// drawing or while a form or modal is open.
    pub fn click_annotation(&mut self, id: AnnotationId) {
        if self.state != InteractionState::Idle {
            self.ignore("annotation click");
            return;
        }
        self.store.select(Some(id));
    }

    /// Click on the image: selects the top-most box under the pointer.
    pub fn click_image(&mut self, at: Point) -> Option<AnnotationId> {
        if self.state != InteractionState::Idle {
            self.ignore("image click");
            return None;
        }
        let hit = self.store.hit_test(&self.active_image, at)?;
        self.store.select(Some(hit));
        Some(hit)
    }

    // ========================================================================
    // Manual Entry
    // ========================================================================

    /// Double-click on the image opens the manual-entry popover.
    pub fn double_click(&mut self, at: Point) {
        if self.state == InteractionState::Idle {
            self.transition(InteractionState::ManualEntryOpen {
                at,
                form: ManualEntryForm::default(),
            });
        } else {
            self.ignore("double click");
        }
    }

    pub fn manual_entry_mut(&mut self) -> Option<&mut ManualEntryForm> {
        match &mut self.state {
            InteractionState::ManualEntryOpen { form, .. } => Some(form),
            _ => None,
        }
    }

    /// Commit the popover as a manual annotation around the click point.
    pub fn save_manual_entry(&mut self) -> Option<AnnotationId> {
        if !matches!(self.state, InteractionState::ManualEntryOpen { .. }) {
            self.ignore("manual save");
            return None;
        }
        let InteractionState::ManualEntryOpen { at, form } = std::mem::take(&mut self.state) else {
            return None;
        };

        let position = Rect::manual_at(at, self.manual_box_size);
        let id = self.store.add(form.build(&self.active_image, position));
        self.store.select(Some(id));
        log::debug!("Interaction: manual-entry-open -> idle (saved {})", id);
        Some(id)
    }

    pub fn cancel_manual_entry(&mut self) {
        if matches!(self.state, InteractionState::ManualEntryOpen { .. }) {
            self.transition(InteractionState::Idle);
        }
    }

    // ========================================================================
    // Editing
    // ========================================================================

    fn open_editor(&mut self, id: AnnotationId) {
        if let Some(annotation) = self.store.get(id) {
            let form = EditForm::new(annotation);
            self.transition(InteractionState::Editing(form));
        }
    }

    /// "Edit" on the selected annotation. Returns false if nothing is
    /// selected or another interaction is in progress.
    pub fn begin_edit(&mut self) -> bool {
        if self.state != InteractionState::Idle {
            self.ignore("edit");
            return false;
        }
        let Some(id) = self.store.selected() else {
            return false;
        };
        self.open_editor(id);
        matches!(self.state, InteractionState::Editing(_))
    }

    pub fn edit_form(&self) -> Option<&EditForm> {
        match &self.state {
            InteractionState::Editing(form) => Some(form),
            _ => None,
        }
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EditForm> {
        match &mut self.state {
            InteractionState::Editing(form) => Some(form),
            _ => None,
        }
    }

    /// Write the working copy back to the store.
    pub fn save_edit(&mut self) -> bool {
        if !matches!(self.state, InteractionState::Editing(_)) {
            self.ignore("edit save");
            return false;
        }
        let InteractionState::Editing(form) = std::mem::take(&mut self.state) else {
            return false;
        };
        let id = form.target();
        let working = form.into_working();
        self.store.update(id, &AnnotationPatch::replace_with(&working));
        log::debug!("Interaction: editing -> idle (saved {})", id);
        true
    }

    /// Drop the working copy; the stored annotation is unchanged.
    pub fn cancel_edit(&mut self) {
        if matches!(self.state, InteractionState::Editing(_)) {
            self.transition(InteractionState::Idle);
        }
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// "Delete" on the selected annotation opens the confirmation modal.
    /// Nothing is removed yet.
    pub fn request_delete(&mut self) -> bool {
        if self.state != InteractionState::Idle {
            self.ignore("delete");
            return false;
        }
        let Some(target) = self.store.selected() else {
            return false;
        };
        self.transition(InteractionState::ConfirmingDelete { target });
        true
    }

    pub fn delete_target(&self) -> Option<AnnotationId> {
        match self.state {
            InteractionState::ConfirmingDelete { target } => Some(target),
            _ => None,
        }
    }

    pub fn confirm_delete(&mut self) -> Option<DamageAnnotation> {
        let InteractionState::ConfirmingDelete { target } = self.state else {
            self.ignore("delete confirm");
            return None;
        };
        self.transition(InteractionState::Idle);
        self.store.remove(target)
    }

    pub fn cancel_delete(&mut self) {
        if matches!(self.state, InteractionState::ConfirmingDelete { .. }) {
            self.transition(InteractionState::Idle);
        }
    }

    // ========================================================================
    // Output
    // ========================================================================

    pub fn render(&self) -> AnalysisView<'_> {
        AnalysisView {
            annotations: self.store.filter_by_image(&self.active_image).collect(),
            selected: self.store.selected(),
            state: &self.state,
            draft: self.state.draft(),
            cursor: self.state.cursor(),
        }
    }

    /// Score the current annotations.
    pub fn fraud_assessment(
        &self,
        policy: &FraudPolicy,
        rng: &mut dyn RandomSource,
    ) -> FraudAssessment {
        fraud::assess(&self.store.snapshot(), policy, rng)
    }

    /// Save the annotation snapshot for this claim and queue a review task.
    ///
    /// The estimate screen reloads the snapshot from `store`. Returns the
    /// snapshot that was written.
    pub fn finish_analysis<S: ClaimStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<Vec<DamageAnnotation>, StoreError> {
        let snapshot = self.store.snapshot();
        store.save_annotations(&self.claim_id, &snapshot)?;

        let priority = if snapshot.iter().any(|a| a.severity == Severity::High) {
            TaskPriority::High
        } else {
            TaskPriority::Medium
        };
        store.append_task(ReviewTask::new(
            TaskType::DamageReview,
            self.claim_id.clone(),
            format!(
                "Review {} damage findings for {}",
                snapshot.len(),
                self.claim_id
            ),
            REVIEW_DUE_IN,
            priority,
        ))?;

        log::info!(
            "Finished analysis for {} with {} annotations",
            self.claim_id,
            snapshot.len()
        );
        Ok(snapshot)
    }
}
