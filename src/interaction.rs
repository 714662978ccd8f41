//! Interaction states for annotating an image.
//!
//! The states are driven by [`AnalysisSession`](crate::session::AnalysisSession);
//! this module holds the state enum and the two forms the user edits while
//! the machine waits for a save or cancel.

use crate::constants::FALLBACK_DAMAGE_TYPE;
use crate::geometry::{Point, Rect};
use crate::input::{parse_amount, parse_confidence};
use crate::model::{AnnotationId, DamageAnnotation, Recommendation, Severity};

/// Where the annotation surface currently is in its interaction flow.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// Nothing in progress.
    #[default]
    Idle,
    /// "Add Assessment" was clicked; the next pointer-down starts a box.
    AwaitingFirstDragPoint,
    /// A box is being dragged out from `anchor` to `current`.
    Dragging { anchor: Point, current: Point },
    /// An annotation is open in the edit form.
    Editing(EditForm),
    /// The manual-entry popover is open for a double-click at `at`.
    ManualEntryOpen { at: Point, form: ManualEntryForm },
    /// The delete confirmation modal is open for `target`.
    ConfirmingDelete { target: AnnotationId },
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::AwaitingFirstDragPoint => "awaiting-first-drag-point",
            InteractionState::Dragging { .. } => "dragging",
            InteractionState::Editing(_) => "editing",
            InteractionState::ManualEntryOpen { .. } => "manual-entry-open",
            InteractionState::ConfirmingDelete { .. } => "confirming-delete",
        }
    }

    /// Armed or dragging: clicks on existing boxes are suppressed.
    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            InteractionState::AwaitingFirstDragPoint | InteractionState::Dragging { .. }
        )
    }

    /// Live rectangle while dragging.
    pub fn draft(&self) -> Option<Rect> {
        match self {
            InteractionState::Dragging { anchor, current } => Some(Rect::from_drag(*anchor, *current)),
            _ => None,
        }
    }

    pub fn cursor(&self) -> CursorHint {
        if self.is_drawing() {
            CursorHint::Crosshair
        } else {
            CursorHint::Default
        }
    }
}

/// Pointer cursor the view should show over the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Crosshair,
}

/// Working copy of an annotation being edited.
///
/// Changes stay here until saved; cancelling drops them.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    working: DamageAnnotation,
}

impl EditForm {
    pub fn new(annotation: &DamageAnnotation) -> Self {
        Self {
            working: annotation.clone(),
        }
    }

    pub fn target(&self) -> AnnotationId {
        self.working.id
    }

    pub fn working(&self) -> &DamageAnnotation {
        &self.working
    }

    pub fn set_type(&mut self, damage_type: impl Into<String>) {
        self.working.damage_type = damage_type.into();
    }

    pub fn set_severity(&mut self, severity: Severity) {
        self.working.severity = severity;
    }

    pub fn set_recommendation(&mut self, recommendation: Option<Recommendation>) {
        self.working.recommendation = recommendation;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.working.notes = notes.into();
    }

    pub fn set_position(&mut self, position: Rect) {
        self.working.position = position;
    }

    /// Set the cost from form text; invalid text keeps the previous value.
    pub fn set_cost_input(&mut self, input: &str) {
        self.working.estimated_cost = parse_amount(input, self.working.estimated_cost);
    }

    pub fn set_part_confidence_input(&mut self, input: &str) {
        self.working.part_confidence = parse_confidence(input, self.working.part_confidence);
    }

    pub fn set_damage_confidence_input(&mut self, input: &str) {
        self.working.damage_confidence = parse_confidence(input, self.working.damage_confidence);
    }

    pub(crate) fn into_working(self) -> DamageAnnotation {
        self.working
    }
}

/// Fields of the manual-entry popover.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualEntryForm {
    pub damage_type: String,
    pub severity: Severity,
    pub recommendation: Option<Recommendation>,
    pub estimated_cost: f64,
    pub notes: String,
}

impl Default for ManualEntryForm {
    fn default() -> Self {
        Self {
            damage_type: String::new(),
            severity: Severity::Medium,
            recommendation: None,
            estimated_cost: 0.0,
            notes: String::new(),
        }
    }
}

impl ManualEntryForm {
    /// Set the cost from form text; invalid text becomes 0.
    pub fn set_cost_input(&mut self, input: &str) {
        self.estimated_cost = parse_amount(input, 0.0);
    }

    /// Build the manual annotation placed on `position`.
    pub(crate) fn build(&self, image_id: &str, position: Rect) -> DamageAnnotation {
        let damage_type = match self.damage_type.trim() {
            "" => FALLBACK_DAMAGE_TYPE,
            trimmed => trimmed,
        };
        let mut annotation = DamageAnnotation::manual(
            image_id,
            damage_type,
            self.severity,
            self.estimated_cost,
            position,
        )
        .with_notes(self.notes.clone());
        annotation.recommendation = self.recommendation;
        annotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_only_while_dragging() {
        let state = InteractionState::Dragging {
            anchor: Point::new(60.0, 60.0),
            current: Point::new(20.0, 30.0),
        };
        assert_eq!(state.draft(), Some(Rect::new(20.0, 30.0, 40.0, 30.0)));
        assert_eq!(state.cursor(), CursorHint::Crosshair);
        assert_eq!(InteractionState::Idle.draft(), None);
        assert_eq!(InteractionState::Idle.cursor(), CursorHint::Default);
        assert_eq!(
            InteractionState::AwaitingFirstDragPoint.cursor(),
            CursorHint::Crosshair
        );
    }

    #[test]
    fn test_edit_form_cost_coercion_keeps_previous() {
        let mut ann = DamageAnnotation::drawn("img", Rect::default());
        ann.estimated_cost = 120.0;
        let mut form = EditForm::new(&ann);

        form.set_cost_input("not a number");
        assert_eq!(form.working().estimated_cost, 120.0);

        form.set_cost_input("310.25");
        assert_eq!(form.working().estimated_cost, 310.25);

        form.set_part_confidence_input("??");
        assert_eq!(form.working().part_confidence, ann.part_confidence);
    }

    #[test]
    fn test_manual_form_blank_type_falls_back() {
        let form = ManualEntryForm::default();
        let ann = form.build("img", Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(ann.damage_type, FALLBACK_DAMAGE_TYPE);
        assert!(ann.is_manual);
    }

    #[test]
    fn test_manual_form_cost_input() {
        let mut form = ManualEntryForm::default();
        form.set_cost_input("abc");
        assert_eq!(form.estimated_cost, 0.0);
        form.set_cost_input("200");
        assert_eq!(form.estimated_cost, 200.0);
    }
}
