//! Finishing an analysis and reopening it on the estimate screen.

use crate::annotation::AnnotationStore;
use crate::config::EngineConfig;
use crate::estimate::EstimateSession;
use crate::fraud::{FixedJitter, FraudStatus};
use crate::geometry::Point;
use crate::model::{CostCategory, TaskPriority, TaskType, seeded_annotations};
use crate::persistence::{ClaimStore, JsonClaimStore, MemoryBackend};
use crate::session::AnalysisSession;

const CLAIM: &str = "CLM-2024-001";

fn seeded(config: &EngineConfig) -> AnalysisSession {
    AnalysisSession::with_store(
        CLAIM,
        "front",
        AnnotationStore::from_annotations(seeded_annotations("front")),
        config,
    )
}

#[test]
fn test_seeded_analysis_to_estimate() {
    let config = EngineConfig::default();
    let mut store = JsonClaimStore::new(MemoryBackend::new());
    let mut analysis = seeded(&config);

    analysis.finish_analysis(&mut store).expect("finish");
    let session = EstimateSession::open(&store, CLAIM, &config);
    let estimate = session.estimate();

    for cost in [950.0, 450.0, 350.0, 250.0] {
        assert!(
            estimate.items().iter().any(|i| i.unit_cost() == cost && !i.is_ai_generated()),
            "missing item for {}",
            cost
        );
    }
    let recommended: Vec<_> = estimate
        .items()
        .iter()
        .filter(|i| i.is_ai_recommended())
        .map(|i| (i.unit_cost(), i.category()))
        .collect();
    assert_eq!(
        recommended,
        vec![(350.0, CostCategory::Parts), (500.0, CostCategory::Labor)]
    );

    let subtotal: f64 = estimate.items().iter().map(|i| i.total_cost()).sum();
    assert_eq!(subtotal, 2850.0);
    let totals = estimate.totals();
    assert_eq!(totals.subtotal, subtotal);
    assert_eq!(totals.tax, subtotal * 0.08);
    assert_eq!(totals.total, subtotal + subtotal * 0.08);
}

#[test]
fn test_finish_queues_review_task() {
    let config = EngineConfig::default();
    let mut store = JsonClaimStore::new(MemoryBackend::new());

    seeded(&config).finish_analysis(&mut store).expect("finish");
    let mut plain = AnalysisSession::new("CLM-2024-002", "side", &config);
    plain.double_click(Point::new(50.0, 50.0));
    plain.save_manual_entry();
    plain.finish_analysis(&mut store).expect("finish");

    let tasks = store.load_tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].task_type, TaskType::DamageReview);
    assert_eq!(tasks[0].claim_id, CLAIM);
    assert_eq!(tasks[0].priority, TaskPriority::High);
    assert_eq!(tasks[0].due_in, "2 days");
    assert_eq!(tasks[1].priority, TaskPriority::Medium);
    assert_eq!(tasks[1].id, 2);
}

#[test]
fn test_estimate_reads_store_not_live_session() {
    let config = EngineConfig::default();
    let mut store = JsonClaimStore::new(MemoryBackend::new());
    let mut analysis = seeded(&config);
    analysis.finish_analysis(&mut store).expect("finish");

    // Later edits are not visible until the next finish
    analysis.click_annotation(1);
    analysis.request_delete();
    analysis.confirm_delete();

    let session = EstimateSession::open(&store, CLAIM, &config);
    assert_eq!(session.snapshot().len(), 4);

    analysis.finish_analysis(&mut store).expect("finish");
    let session = EstimateSession::open(&store, CLAIM, &config);
    assert_eq!(session.snapshot().len(), 3);
}

#[test]
fn test_resume_continues_saved_analysis() {
    let config = EngineConfig::default();
    let mut store = JsonClaimStore::new(MemoryBackend::new());
    seeded(&config).finish_analysis(&mut store).expect("finish");

    let mut resumed = AnalysisSession::resume(&store, CLAIM, "front", &config);
    assert_eq!(resumed.annotations().len(), 4);

    resumed.arm_drawing();
    resumed.pointer_down(Point::new(0.0, 0.0));
    let id = resumed.pointer_up(Point::new(10.0, 10.0)).expect("created");
    assert!(id > 4);
}

#[test]
fn test_fraud_policies_differ_by_screen() {
    let config = EngineConfig::default();
    let mut store = JsonClaimStore::new(MemoryBackend::new());
    let mut analysis = seeded(&config);
    analysis.double_click(Point::new(50.0, 50.0));
    analysis.save_manual_entry();
    analysis.finish_analysis(&mut store).expect("finish");

    // 4 seeded + 1 manual at cost 0: average 400, one high, one manual
    let detail = analysis.fraud_assessment(&config.fraud.detail, &mut FixedJitter(0));
    assert_eq!(detail.score, 10);
    assert_eq!(detail.status, FraudStatus::Passed);

    let session = EstimateSession::open(&store, CLAIM, &config);
    let estimate = session.fraud_assessment(&mut FixedJitter(0));
    assert_eq!(estimate.score, 45);
    assert_eq!(estimate.status, FraudStatus::Caution);
}
