//! Event sequences on the analysis session.

use assert_matches::assert_matches;

use crate::annotation::AnnotationStore;
use crate::config::EngineConfig;
use crate::geometry::{ElementBounds, Point, Rect};
use crate::interaction::InteractionState;
use crate::model::{Recommendation, Severity, seeded_annotations};
use crate::session::AnalysisSession;

fn seeded() -> AnalysisSession {
    AnalysisSession::with_store(
        "CLM-2024-001",
        "front",
        AnnotationStore::from_annotations(seeded_annotations("front")),
        &EngineConfig::default(),
    )
}

#[test]
fn test_manual_double_click_entry() {
    let mut session = AnalysisSession::new("CLM-2024-001", "front", &EngineConfig::default());

    session.double_click(Point::new(40.0, 30.0));
    let form = session.manual_entry_mut().expect("popover open");
    form.damage_type = "Dent".to_string();
    form.severity = Severity::Low;
    form.set_cost_input("200");

    let id = session.save_manual_entry().expect("saved");
    let ann = session.annotations().get(id).expect("stored");

    assert!(ann.is_manual);
    assert_eq!(ann.damage_type, "Dent");
    assert_eq!(ann.severity, Severity::Low);
    assert_eq!(ann.estimated_cost, 200.0);
    assert_eq!(ann.position, Rect::new(35.0, 25.0, 10.0, 10.0));
    assert_eq!(ann.part_confidence, 1.0);
    assert_eq!(ann.damage_confidence, 1.0);
    assert_eq!(ann.effective_recommendation(), Recommendation::Touchup);
    assert_eq!(session.selected(), Some(id));
    assert_eq!(session.state(), &InteractionState::Idle);
}

#[test]
fn test_manual_entry_near_corner_is_clamped() {
    let mut session = AnalysisSession::new("CLM-2024-001", "front", &EngineConfig::default());
    session.double_click(Point::new(2.0, 3.0));
    let id = session.save_manual_entry().expect("saved");

    let position = session.annotations().get(id).map(|a| a.position);
    assert_eq!(position, Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
}

#[test]
fn test_draft_size_threshold() {
    // (drag end, expected to create)
    let cases = [
        (Point::new(15.0, 15.0), false),
        (Point::new(15.1, 15.1), true),
        (Point::new(15.1, 15.0), false),
        (Point::new(40.0, 12.0), false),
        (Point::new(4.0, 4.0), true),
        (Point::new(10.0, 10.0), false),
    ];

    for (end, creates) in cases {
        let mut session =
            AnalysisSession::new("CLM-2024-001", "front", &EngineConfig::default());
        session.arm_drawing();
        session.pointer_down(Point::new(10.0, 10.0));
        session.pointer_move(end);
        let created = session.pointer_up(end);

        assert_eq!(created.is_some(), creates, "drag to {:?}", end);
        assert_eq!(session.annotations().len(), usize::from(creates));
    }
}

#[test]
fn test_client_coordinates_drive_drawing() {
    let bounds = ElementBounds::new(100.0, 50.0, 800.0, 400.0);
    let mut session = AnalysisSession::new("CLM-2024-001", "front", &EngineConfig::default());

    session.arm_drawing();
    session.pointer_down(Point::from_client(180.0, 90.0, &bounds));
    let end = Point::from_client(500.0, 250.0, &bounds);
    let id = session.pointer_up(end).expect("created");

    let position = session.annotations().get(id).map(|a| a.position);
    assert_eq!(position, Some(Rect::new(10.0, 10.0, 40.0, 40.0)));
}

#[test]
fn test_selection_toggle_has_no_side_effects() {
    let mut session = seeded();
    let before = session.annotations().snapshot();

    session.click_annotation(1);
    assert_eq!(session.selected(), Some(1));
    session.click_annotation(2);
    assert_eq!(session.selected(), Some(2));
    session.click_annotation(2);
    assert_eq!(session.selected(), None);

    assert_eq!(session.annotations().snapshot(), before);
}

#[test]
fn test_delete_requires_confirmation() {
    let mut session = seeded();
    session.click_annotation(4);

    assert!(session.request_delete());
    assert_eq!(session.annotations().len(), 4);
    assert_matches!(session.state(), InteractionState::ConfirmingDelete { target: 4 });

    // Other input is ignored while the modal is open
    session.click_annotation(1);
    session.double_click(Point::new(50.0, 50.0));
    assert_eq!(session.delete_target(), Some(4));

    session.cancel_delete();
    assert_eq!(session.annotations().snapshot(), seeded_annotations("front"));

    session.request_delete();
    session.confirm_delete();
    assert_eq!(session.annotations().len(), 3);
    assert!(session.annotations().get(4).is_none());
}

#[test]
fn test_new_box_flows_into_edit_and_save() {
    let mut session = seeded();
    session.arm_drawing();
    session.pointer_down(Point::new(60.0, 10.0));
    let id = session.pointer_up(Point::new(80.0, 30.0)).expect("created");

    let form = session.edit_form_mut().expect("editing");
    form.set_type("Hood Dent");
    form.set_severity(Severity::High);
    form.set_recommendation(Some(Recommendation::Repair));
    form.set_cost_input("1,250");
    form.set_notes("Crease along the hood line");
    assert!(session.save_edit());

    let ann = session.annotations().get(id).expect("stored");
    assert_eq!(ann.estimated_cost, 1250.0);
    assert_eq!(ann.effective_recommendation(), Recommendation::Repair);
    assert_eq!(ann.notes, "Crease along the hood line");
    assert_eq!(session.render().annotations.len(), 5);
}
